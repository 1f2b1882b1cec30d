//! Route identification.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up the route identifier for a request
//! - Return the identifier or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in priority order (acceptable for typical route counts)
//! - First match wins; ties keep declaration order

use axum::http::{Method, Request};

use crate::config::RouteConfig;
use crate::routing::matcher::{AndMatcher, HostMatcher, Matcher, MethodMatcher, PathPrefixMatcher, RequestTarget};

/// A compiled route.
#[derive(Debug)]
pub struct Route {
    pub name: String,
    pub priority: u32,
    matcher: AndMatcher,
}

impl Route {
    /// Compile a route from its configuration.
    ///
    /// Configs are validated before compilation; an unparsable method here is
    /// dropped from the matcher set and logged.
    pub fn from_config(config: &RouteConfig) -> Self {
        let mut matchers: Vec<Box<dyn Matcher>> = Vec::new();
        if let Some(host) = &config.host {
            matchers.push(Box::new(HostMatcher::new(host.clone())));
        }
        if let Some(prefix) = &config.path_prefix {
            matchers.push(Box::new(PathPrefixMatcher::new(prefix.clone())));
        }
        if let Some(method) = &config.method {
            match method.parse::<Method>() {
                Ok(method) => matchers.push(Box::new(MethodMatcher::new(method))),
                Err(_) => tracing::warn!(route = %config.name, method = %method, "Ignoring invalid route method"),
            }
        }

        Self {
            name: config.name.trim().to_string(),
            priority: config.priority,
            matcher: AndMatcher::new(matchers),
        }
    }
}

/// Routes in match order.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn from_config(configs: &[RouteConfig]) -> Self {
        let mut routes: Vec<Route> = configs.iter().map(Route::from_config).collect();
        routes.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self { routes }
    }

    /// Route identifier of the first matching route.
    pub fn identify<B>(&self, req: &Request<B>) -> Option<&str> {
        let target = RequestTarget::from_request(req);
        self.routes
            .iter()
            .find(|route| route.matcher.matches(&target))
            .map(|route| route.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
