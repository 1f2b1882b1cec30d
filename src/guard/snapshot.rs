//! Per-request view consumed by the classifier.
//!
//! A snapshot is built from request parts after routing and before the body
//! is read. It owns copies of the few header values the guard needs so the
//! decision never holds a borrow on the live request.

use axum::body::Bytes;
use axum::http::{header, request::Parts, HeaderMap, Method};

/// Payload format negotiated from the `Content-Type` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    Json,
    Text,
    Other,
}

impl ContentFormat {
    /// Negotiate a format from a raw `Content-Type` value.
    ///
    /// Only the media type essence is considered; parameters such as
    /// `charset` are ignored and matching is case-insensitive.
    pub fn negotiate(content_type: &str) -> Self {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "application/json" | "application/x-json" | "text/json" | "application/jsonrequest" => {
                Self::Json
            }
            "text/plain" => Self::Text,
            _ => Self::Other,
        }
    }
}

/// Request metadata the guard decides on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSnapshot {
    pub method: Method,
    /// `None` when the header is missing or not a valid integer.
    pub declared_content_length: Option<u64>,
    pub content_type: String,
    pub format: ContentFormat,
    /// Leading body bytes, only captured for plain-text requests.
    pub body_preview: Bytes,
    pub route_id: String,
}

impl RequestSnapshot {
    /// Create an empty snapshot for a method and route.
    pub fn new(method: Method, route_id: impl Into<String>) -> Self {
        Self {
            method,
            declared_content_length: None,
            content_type: String::new(),
            format: ContentFormat::Other,
            body_preview: Bytes::new(),
            route_id: route_id.into(),
        }
    }

    /// Capture method and headers from routed request parts.
    pub fn from_parts(parts: &Parts, route_id: impl Into<String>) -> Self {
        let content_type = parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        Self {
            declared_content_length: declared_content_length(&parts.headers),
            ..Self::new(parts.method.clone(), route_id).with_content_type(content_type)
        }
    }

    /// Set the raw content type and the format negotiated from it.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self.format = ContentFormat::negotiate(&self.content_type);
        self
    }

    pub fn with_content_length(mut self, length: u64) -> Self {
        self.declared_content_length = Some(length);
        self
    }

    pub fn with_body_preview(mut self, preview: impl Into<Bytes>) -> Self {
        self.body_preview = preview.into();
        self
    }
}

/// Parse the declared `Content-Length`.
///
/// Missing, non-UTF-8 or non-numeric values are treated as absent.
pub fn declared_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_negotiate_formats() {
        assert_eq!(ContentFormat::negotiate("application/json"), ContentFormat::Json);
        assert_eq!(
            ContentFormat::negotiate("Application/JSON; charset=utf-8"),
            ContentFormat::Json
        );
        assert_eq!(ContentFormat::negotiate("text/json"), ContentFormat::Json);
        assert_eq!(ContentFormat::negotiate("text/plain;charset=UTF-8"), ContentFormat::Text);
        assert_eq!(ContentFormat::negotiate("application/vnd.api+json"), ContentFormat::Other);
        assert_eq!(ContentFormat::negotiate("multipart/form-data"), ContentFormat::Other);
        assert_eq!(ContentFormat::negotiate(""), ContentFormat::Other);
    }

    #[test]
    fn test_content_length_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(declared_content_length(&headers), None);

        headers.insert(header::CONTENT_LENGTH, "2048".parse().unwrap());
        assert_eq!(declared_content_length(&headers), Some(2048));

        headers.insert(header::CONTENT_LENGTH, "abc".parse().unwrap());
        assert_eq!(declared_content_length(&headers), None);

        headers.insert(header::CONTENT_LENGTH, "-1".parse().unwrap());
        assert_eq!(declared_content_length(&headers), None);
    }

    #[test]
    fn test_from_parts() {
        let (parts, _) = Request::builder()
            .method(Method::POST)
            .uri("/api/upload")
            .header("content-type", "application/json")
            .header("content-length", "42")
            .body(())
            .unwrap()
            .into_parts();

        let snapshot = RequestSnapshot::from_parts(&parts, "Upload::store");
        assert_eq!(snapshot.method, Method::POST);
        assert_eq!(snapshot.declared_content_length, Some(42));
        assert_eq!(snapshot.content_type, "application/json");
        assert_eq!(snapshot.format, ContentFormat::Json);
        assert!(snapshot.body_preview.is_empty());
        assert_eq!(snapshot.route_id, "Upload::store");
    }

    #[test]
    fn test_from_parts_without_headers() {
        let (parts, _) = Request::builder()
            .method(Method::POST)
            .body(())
            .unwrap()
            .into_parts();

        let snapshot = RequestSnapshot::from_parts(&parts, "r");
        assert_eq!(snapshot.declared_content_length, None);
        assert_eq!(snapshot.content_type, "");
        assert_eq!(snapshot.format, ContentFormat::Other);
    }
}
