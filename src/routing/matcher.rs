//! Route matching logic.
//!
//! # Responsibilities
//! - Match host header (exact match, case-insensitive, port ignored)
//! - Match path prefix (case-sensitive, segment aware)
//! - Match method
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Empty condition = always matches (wildcard)
//! - No regex to guarantee O(n) matching

use axum::http::{header, Method, Request};

/// The parts of a request that route matching looks at.
#[derive(Debug, Clone, Copy)]
pub struct RequestTarget<'a> {
    pub method: &'a Method,
    pub host: Option<&'a str>,
    pub path: &'a str,
}

impl<'a> RequestTarget<'a> {
    /// Host comes from the `Host` header, falling back to the URI authority.
    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        let host = req
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| req.uri().host());
        Self {
            method: req.method(),
            host,
            path: req.uri().path(),
        }
    }
}

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, target: &RequestTarget<'_>) -> bool;
}

/// Matches the Host header.
#[derive(Debug, Clone)]
pub struct HostMatcher {
    expected_host: String,
}

impl HostMatcher {
    /// The host is normalized to lowercase for case-insensitive matching.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            expected_host: host.into().to_lowercase(),
        }
    }
}

impl Matcher for HostMatcher {
    fn matches(&self, target: &RequestTarget<'_>) -> bool {
        target
            .host
            .map(|h| h.split(':').next().unwrap_or(h).eq_ignore_ascii_case(&self.expected_host))
            .unwrap_or(false)
    }
}

/// Matches the request path prefix on segment boundaries.
///
/// `/api/upload` matches `/api/upload` and `/api/upload/1`, not `/api/uploads`.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, target: &RequestTarget<'_>) -> bool {
        match target.path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || self.prefix.ends_with('/'),
            None => false,
        }
    }
}

/// Matches a single HTTP method.
#[derive(Debug, Clone)]
pub struct MethodMatcher {
    method: Method,
}

impl MethodMatcher {
    pub fn new(method: Method) -> Self {
        Self { method }
    }
}

impl Matcher for MethodMatcher {
    fn matches(&self, target: &RequestTarget<'_>) -> bool {
        *target.method == self.method
    }
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, target: &RequestTarget<'_>) -> bool {
        self.matchers.iter().all(|m| m.matches(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: Method, host: &str, uri: &str) -> Request<()> {
        Request::builder()
            .method(method)
            .header("Host", host)
            .uri(uri)
            .body(())
            .unwrap()
    }

    fn matches(matcher: &dyn Matcher, req: Request<()>) -> bool {
        matcher.matches(&RequestTarget::from_request(&req))
    }

    #[test]
    fn test_host_matcher() {
        let matcher = HostMatcher::new("example.com");
        assert!(matches(&matcher, request(Method::GET, "example.com", "/")));
        assert!(matches(&matcher, request(Method::GET, "EXAMPLE.COM:8080", "/")));
        assert!(!matches(&matcher, request(Method::GET, "other.com", "/")));
    }

    #[test]
    fn test_path_matcher() {
        let matcher = PathPrefixMatcher::new("/api/upload");
        assert!(matches(&matcher, request(Method::POST, "h", "/api/upload")));
        assert!(matches(&matcher, request(Method::POST, "h", "/api/upload/7")));
        assert!(!matches(&matcher, request(Method::POST, "h", "/api/uploads")));
        assert!(!matches(&matcher, request(Method::POST, "h", "/images")));

        let root = PathPrefixMatcher::new("/");
        assert!(matches(&root, request(Method::POST, "h", "/anything")));
    }

    #[test]
    fn test_and_matcher() {
        let matcher = AndMatcher::new(vec![
            Box::new(MethodMatcher::new(Method::POST)),
            Box::new(PathPrefixMatcher::new("/api")),
        ]);
        assert!(matches(&matcher, request(Method::POST, "h", "/api/x")));
        assert!(!matches(&matcher, request(Method::GET, "h", "/api/x")));
        assert!(matches(&AndMatcher::new(Vec::new()), request(Method::GET, "h", "/")));
    }
}
