//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the guard.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::guard::resolver::{DEFAULT_ACTION, DEFAULT_MAX_BYTES};
use crate::guard::size_guard::DEFAULT_SNIFF_BYTES;

/// Root configuration for the guard server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GuardConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Global guard settings.
    pub guard: GuardSettings,

    /// Route definitions mapping requests to route identifiers.
    pub routes: Vec<RouteConfig>,

    /// Declared per-handler byte limits.
    pub limits: Vec<LimitConfig>,

    /// Upstream application receiving guarded requests.
    pub upstream: Option<UpstreamConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Global guard settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GuardSettings {
    /// Limit in bytes for routes without a declaration.
    pub default_max_bytes: u64,

    /// Entry point name assumed for single-action handlers.
    pub default_action: String,

    /// Leading body bytes captured to sniff plain-text payloads.
    pub sniff_bytes: usize,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            default_max_bytes: DEFAULT_MAX_BYTES,
            default_action: DEFAULT_ACTION.to_string(),
            sniff_bytes: DEFAULT_SNIFF_BYTES,
        }
    }
}

/// Route configuration assigning a route identifier to matching requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier, e.g. "UploadController::store".
    pub name: String,

    /// Host header to match (exact match).
    pub host: Option<String>,

    /// Path prefix to match.
    pub path_prefix: Option<String>,

    /// HTTP method to match.
    pub method: Option<String>,

    /// Route priority (higher = checked first).
    #[serde(default)]
    pub priority: u32,
}

/// A declared byte limit for one handler action.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitConfig {
    /// Handler identifier, e.g. "UploadController".
    pub handler: String,

    /// Action on the handler; omitted for single-action handlers.
    pub action: Option<String>,

    /// Maximum declared content length in bytes. Must be positive.
    pub max_bytes: i64,
}

/// Upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Upstream address (e.g., "127.0.0.1:3000").
    pub address: String,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub log_json: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
