//! Request classification: does this request need a size check?
//!
//! # Responsibilities
//! - Method predicate (payload-bearing write method)
//! - Declared length predicate (present, numeric, non-zero)
//! - JSON likelihood predicate (negotiated format, header substring, body sniff)
//! - Combine predicates with AND semantics
//!
//! # Design Decisions
//! - Ambiguous signals skip the check instead of rejecting
//! - Body sniffing only looks at the first non-whitespace byte
//! - Predicates are pure and never mutate the snapshot

use axum::http::Method;

use crate::guard::snapshot::{ContentFormat, RequestSnapshot};

/// A single condition a request must satisfy to be checked.
pub trait Predicate: Send + Sync + std::fmt::Debug {
    fn holds(&self, snapshot: &RequestSnapshot) -> bool;
}

/// Holds for the payload-bearing write method.
#[derive(Debug, Clone)]
pub struct MethodPredicate {
    method: Method,
}

impl MethodPredicate {
    pub fn new(method: Method) -> Self {
        Self { method }
    }
}

impl Default for MethodPredicate {
    fn default() -> Self {
        Self::new(Method::POST)
    }
}

impl Predicate for MethodPredicate {
    fn holds(&self, snapshot: &RequestSnapshot) -> bool {
        snapshot.method == self.method
    }
}

/// Holds when a non-zero content length was declared.
#[derive(Debug, Clone, Default)]
pub struct DeclaredLengthPredicate;

impl Predicate for DeclaredLengthPredicate {
    fn holds(&self, snapshot: &RequestSnapshot) -> bool {
        matches!(snapshot.declared_content_length, Some(len) if len > 0)
    }
}

/// Holds when the payload is, or looks like, JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonLikelihoodPredicate;

impl JsonLikelihoodPredicate {
    fn declares_json(snapshot: &RequestSnapshot) -> bool {
        snapshot.format == ContentFormat::Json
            || snapshot.content_type.to_ascii_lowercase().contains("json")
    }
}

impl Predicate for JsonLikelihoodPredicate {
    fn holds(&self, snapshot: &RequestSnapshot) -> bool {
        Self::declares_json(snapshot)
            || (snapshot.format == ContentFormat::Text && looks_like_json(&snapshot.body_preview))
    }
}

/// True when the first non-whitespace byte opens a JSON object or array.
pub fn looks_like_json(body: &[u8]) -> bool {
    matches!(
        body.iter().find(|b| !b.is_ascii_whitespace()),
        Some(b'{') | Some(b'[')
    )
}

/// Decides whether a request is subject to the size check.
#[derive(Debug)]
pub struct RequestClassifier {
    predicates: Vec<Box<dyn Predicate>>,
}

impl RequestClassifier {
    pub fn new(predicates: Vec<Box<dyn Predicate>>) -> Self {
        Self { predicates }
    }

    /// All predicates must hold.
    pub fn should_check(&self, snapshot: &RequestSnapshot) -> bool {
        self.predicates.iter().all(|p| p.holds(snapshot))
    }

    /// Whether a body preview could change the decision for this request.
    ///
    /// Lets the HTTP layer skip reading the body when the verdict is already
    /// determined by headers alone.
    pub fn needs_preview(&self, snapshot: &RequestSnapshot) -> bool {
        snapshot.format == ContentFormat::Text
            && snapshot.body_preview.is_empty()
            && !JsonLikelihoodPredicate::declares_json(snapshot)
            && MethodPredicate::default().holds(snapshot)
            && DeclaredLengthPredicate.holds(snapshot)
    }
}

impl Default for RequestClassifier {
    fn default() -> Self {
        Self::new(vec![
            Box::new(MethodPredicate::default()),
            Box::new(DeclaredLengthPredicate),
            Box::new(JsonLikelihoodPredicate),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(content_type: &str, length: u64) -> RequestSnapshot {
        RequestSnapshot::new(Method::POST, "Ctrl::act")
            .with_content_type(content_type)
            .with_content_length(length)
    }

    #[test]
    fn test_json_post_is_checked() {
        let classifier = RequestClassifier::default();
        assert!(classifier.should_check(&post("application/json", 10)));
        assert!(classifier.should_check(&post("application/json; charset=utf-8", 10)));
    }

    #[test]
    fn test_json_substring_is_checked() {
        let classifier = RequestClassifier::default();
        assert!(classifier.should_check(&post("application/vnd.api+json", 10)));
        assert!(classifier.should_check(&post("application/merge-patch+JSON", 10)));
    }

    #[test]
    fn test_get_is_exempt() {
        let classifier = RequestClassifier::default();
        let snapshot = RequestSnapshot::new(Method::GET, "Ctrl::act")
            .with_content_type("application/json")
            .with_content_length(1_000_000);
        assert!(!classifier.should_check(&snapshot));

        let snapshot = RequestSnapshot {
            method: Method::PUT,
            ..post("application/json", 10)
        };
        assert!(!classifier.should_check(&snapshot));
    }

    #[test]
    fn test_missing_or_zero_length_is_exempt() {
        let classifier = RequestClassifier::default();
        assert!(!classifier.should_check(&post("application/json", 0)));

        let snapshot = RequestSnapshot::new(Method::POST, "Ctrl::act")
            .with_content_type("application/json");
        assert!(!classifier.should_check(&snapshot));
    }

    #[test]
    fn test_plain_text_sniffing() {
        let classifier = RequestClassifier::default();

        let hello = post("text/plain", 5).with_body_preview("hello");
        assert!(!classifier.should_check(&hello));

        let object = post("text/plain", 7).with_body_preview(r#"{"a":1}"#);
        assert!(classifier.should_check(&object));

        let array = post("text/plain", 50).with_body_preview("  \n\t[1, 2, 3]");
        assert!(classifier.should_check(&array));

        let empty = post("text/plain", 5);
        assert!(!classifier.should_check(&empty));

        let blank = post("text/plain", 5).with_body_preview("   ");
        assert!(!classifier.should_check(&blank));
    }

    #[test]
    fn test_sniffing_only_applies_to_plain_text() {
        let classifier = RequestClassifier::default();
        let snapshot = post("application/octet-stream", 7).with_body_preview(r#"{"a":1}"#);
        assert!(!classifier.should_check(&snapshot));

        let snapshot = post("", 7).with_body_preview("[1]");
        assert!(!classifier.should_check(&snapshot));
    }

    #[test]
    fn test_needs_preview() {
        let classifier = RequestClassifier::default();
        assert!(classifier.needs_preview(&post("text/plain", 5)));
        assert!(!classifier.needs_preview(&post("text/plain", 5).with_body_preview("x")));
        assert!(!classifier.needs_preview(&post("application/json", 5)));
        assert!(!classifier.needs_preview(&post("text/plain", 0)));
        assert!(!classifier.needs_preview(&RequestSnapshot {
            method: Method::GET,
            ..post("text/plain", 5)
        }));
    }

    #[test]
    fn test_looks_like_json() {
        assert!(looks_like_json(b"{}"));
        assert!(looks_like_json(b"\r\n ["));
        assert!(!looks_like_json(b""));
        assert!(!looks_like_json(b"\"string\""));
        assert!(!looks_like_json(b"null"));
    }
}
