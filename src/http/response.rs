//! Client-facing error responses.
//!
//! # Design Decisions
//! - Every guard rejection becomes a well-formed 413 JSON body, never a 500
//! - Byte counts are omitted from the body when unknown

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::PayloadTooLarge;

/// Error body returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_length: Option<u64>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            received_length: None,
            allowed_length: None,
        }
    }
}

impl From<PayloadTooLarge> for ErrorResponse {
    fn from(rejection: PayloadTooLarge) -> Self {
        Self {
            error: rejection.to_string(),
            received_length: Some(rejection.received_bytes),
            allowed_length: Some(rejection.allowed_bytes),
        }
    }
}

impl IntoResponse for PayloadTooLarge {
    fn into_response(self) -> Response {
        (StatusCode::PAYLOAD_TOO_LARGE, Json(ErrorResponse::from(self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_payload_too_large_response() {
        let response = PayloadTooLarge {
            received_bytes: 2048,
            allowed_bytes: 1024,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["received_length"], 2048);
        assert_eq!(json["allowed_length"], 1024);
        assert!(json["error"].as_str().unwrap().contains("1024"));
    }

    #[test]
    fn test_error_response_omits_unknown_lengths() {
        let json = serde_json::to_value(ErrorResponse::new("Upstream request failed")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Upstream request failed" }));
    }
}
