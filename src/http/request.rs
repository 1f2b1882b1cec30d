//! Request identification.
//!
//! # Responsibilities
//! - Attach the route identifier the guard resolves limits for
//! - Read the request ID assigned by the outer request-id layer
//!
//! # Design Decisions
//! - An identifier already present (set by an embedding host) is kept
//! - Unrouted requests fall back to the matched path, then the raw path;
//!   catch-all patterns are skipped

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::routing::RouteTable;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Route identifier of a request, stored as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteId(pub String);

/// Middleware assigning a [`RouteId`] from the configured route table.
pub async fn route_identity_middleware(
    State(table): State<Arc<RouteTable>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if req.extensions().get::<RouteId>().is_none() {
        if let Some(name) = table.identify(&req) {
            let route_id = RouteId(name.to_string());
            req.extensions_mut().insert(route_id);
        }
    }
    next.run(req).await
}

/// Route identifier for a request.
pub fn route_identifier<B>(req: &Request<B>) -> String {
    if let Some(RouteId(id)) = req.extensions().get::<RouteId>() {
        return id.clone();
    }
    if let Some(matched) = req.extensions().get::<MatchedPath>() {
        if !is_catch_all(matched.as_str()) {
            return matched.as_str().to_string();
        }
    }
    req.uri().path().to_string()
}

/// Patterns that match any path and so name no route.
fn is_catch_all(pattern: &str) -> bool {
    pattern == "/" || pattern.starts_with("/{*")
}

/// Request ID assigned by the request-id layer, if any.
pub fn request_id<B>(req: &Request<B>) -> &str {
    req.headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_identifier_precedence() {
        let mut req = Request::builder().uri("/api/upload?x=1").body(()).unwrap();
        assert_eq!(route_identifier(&req), "/api/upload");

        req.extensions_mut().insert(RouteId("Upload::store".into()));
        assert_eq!(route_identifier(&req), "Upload::store");
    }

    #[test]
    fn test_catch_all_patterns_are_not_identifiers() {
        assert!(is_catch_all("/"));
        assert!(is_catch_all("/{*path}"));
        assert!(!is_catch_all("/users/{id}"));
        assert!(!is_catch_all("/webhook"));
    }

    #[test]
    fn test_request_id() {
        let req = Request::builder().header(X_REQUEST_ID, "abc").body(()).unwrap();
        assert_eq!(request_id(&req), "abc");
        let req = Request::builder().body(()).unwrap();
        assert_eq!(request_id(&req), "unknown");
    }
}
