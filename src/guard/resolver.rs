//! Per-route limit resolution.
//!
//! # Lookup Order
//! ```text
//! route identifier
//!     → exact entry ("Handler::action")
//!     → default-action entry ("Handler" + "::handle"), only when the
//!       identifier carries no action suffix
//!     → default_max_bytes
//! ```
//!
//! # Design Decisions
//! - Limits are compiled once into an immutable map; lookups never fail
//! - Declared limits are `NonZeroU64`, so a zero limit cannot exist at runtime
//! - Single-action handlers are routed by handler name alone while their limit
//!   is declared on the entry point, hence the second lookup step

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroU64;

use crate::config::schema::GuardConfig;
use crate::config::validation::ValidationError;

/// Separator between handler and action in a route identifier.
pub const ROUTE_SEPARATOR: &str = "::";

/// Entry point name of single-action handlers.
pub const DEFAULT_ACTION: &str = "handle";

/// Global limit applied when no route declares one (10 KiB).
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024;

/// A `(handler, action)` pair naming one declared limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    handler: String,
    action: String,
}

impl RouteKey {
    /// Create a key, rejecting empty parts and parts containing the separator.
    pub fn new(handler: impl Into<String>, action: impl Into<String>) -> Result<Self, ValidationError> {
        let handler = handler.into();
        let action = action.into();
        check_identifier("handler", &handler)?;
        check_identifier("action", &action)?;
        Ok(Self { handler, action })
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    pub fn action(&self) -> &str {
        &self.action
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.handler, ROUTE_SEPARATOR, self.action)
    }
}

pub(crate) fn check_identifier(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyIdentifier { field });
    }
    if value.contains(ROUTE_SEPARATOR) {
        return Err(ValidationError::InvalidIdentifier {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Immutable mapping of route identifier to declared byte limit.
#[derive(Debug, Clone, Default)]
pub struct RouteLimits {
    entries: HashMap<String, NonZeroU64>,
}

impl RouteLimits {
    pub fn builder() -> RouteLimitsBuilder {
        RouteLimitsBuilder::default()
    }

    /// Look up the limit declared for an exact route identifier.
    pub fn get(&self, route_id: &str) -> Option<NonZeroU64> {
        self.entries.get(route_id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(route identifier, limit)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.get()))
    }
}

/// Startup-time builder collecting limit declarations.
#[derive(Debug, Default)]
pub struct RouteLimitsBuilder {
    entries: HashMap<String, NonZeroU64>,
}

impl RouteLimitsBuilder {
    /// Declare a limit for a route.
    ///
    /// Non-positive limits and duplicate declarations are configuration errors.
    pub fn declare(&mut self, key: RouteKey, max_bytes: i64) -> Result<&mut Self, ValidationError> {
        let route = key.to_string();
        let limit = u64::try_from(max_bytes)
            .ok()
            .and_then(NonZeroU64::new)
            .ok_or_else(|| ValidationError::NonPositiveLimit {
                route: route.clone(),
                max_bytes,
            })?;

        if self.entries.contains_key(&route) {
            return Err(ValidationError::DuplicateLimit { route });
        }

        self.entries.insert(route, limit);
        Ok(self)
    }

    pub fn build(self) -> RouteLimits {
        RouteLimits {
            entries: self.entries,
        }
    }
}

/// Everything the resolver reads; shared read-only by all requests.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub route_limits: RouteLimits,
    pub default_max_bytes: NonZeroU64,
    pub default_action: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            route_limits: RouteLimits::default(),
            default_max_bytes: NonZeroU64::new(DEFAULT_MAX_BYTES).unwrap_or(NonZeroU64::MIN),
            default_action: DEFAULT_ACTION.to_string(),
        }
    }
}

/// Resolves the byte limit that applies to a route.
#[derive(Debug, Clone, Default)]
pub struct LimitResolver {
    config: ResolverConfig,
}

impl LimitResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Compile the `[[limits]]` declarations of a loaded configuration.
    pub fn from_config(config: &GuardConfig) -> Result<Self, ValidationError> {
        let default_action = config.guard.default_action.trim();
        check_identifier("default_action", default_action)?;

        let mut builder = RouteLimits::builder();
        for decl in &config.limits {
            let action = decl.action.as_deref().unwrap_or(default_action);
            let key = RouteKey::new(decl.handler.trim(), action.trim())?;
            builder.declare(key, decl.max_bytes)?;
        }

        let default_max_bytes = NonZeroU64::new(config.guard.default_max_bytes)
            .ok_or(ValidationError::ZeroDefaultLimit)?;

        Ok(Self::new(ResolverConfig {
            route_limits: builder.build(),
            default_max_bytes,
            default_action: default_action.to_string(),
        }))
    }

    /// Resolve the limit for a route identifier. Never fails.
    pub fn resolve(&self, route_id: &str) -> u64 {
        if let Some(limit) = self.config.route_limits.get(route_id) {
            return limit.get();
        }

        if !route_id.contains(ROUTE_SEPARATOR) {
            let entry_point = format!("{}{}{}", route_id, ROUTE_SEPARATOR, self.config.default_action);
            if let Some(limit) = self.config.route_limits.get(&entry_point) {
                return limit.get();
            }
        }

        self.config.default_max_bytes.get()
    }

    pub fn default_max_bytes(&self) -> u64 {
        self.config.default_max_bytes.get()
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}
