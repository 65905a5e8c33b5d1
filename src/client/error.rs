//! Error types and message derivation for the events client

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::config::ConfigError;

/// Message used when a call never produced a response.
pub const NETWORK_ERROR_MESSAGE: &str = "Network Error: no response received from server";

/// Errors surfaced by the events client.
///
/// Every variant's display string is the same human-readable message that
/// lands in the error log, so UI layers never re-derive it.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Credentials were missing or incomplete; nothing was sent.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The provider answered with a 4xx/5xx status.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        details: Option<Value>,
    },

    /// The call failed before a response arrived.
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network(#[source] reqwest::Error),

    /// The request could not be constructed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Derive the human-readable message for a provider error response.
///
/// Precedence: the structured `errors[0].detail` field, then the generic
/// `message` field, then the bare status line.
pub(crate) fn api_error_message(status: StatusCode, body: &Value) -> String {
    if let Some(detail) = body.pointer("/errors/0/detail").and_then(Value::as_str) {
        format!("{} Error: {}", status.as_u16(), detail)
    } else if let Some(message) = body.get("message").and_then(Value::as_str) {
        format!("{} Error: {}", status.as_u16(), message)
    } else {
        format!(
            "{} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Error")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_prefers_structured_detail() {
        let body = json!({"errors": [{"detail": "Forbidden"}], "message": "other"});
        assert_eq!(
            api_error_message(StatusCode::FORBIDDEN, &body),
            "403 Error: Forbidden"
        );
    }

    #[test]
    fn test_message_falls_back_to_generic_field() {
        let body = json!({"message": "quota exceeded"});
        assert_eq!(
            api_error_message(StatusCode::TOO_MANY_REQUESTS, &body),
            "429 Error: quota exceeded"
        );
    }

    #[test]
    fn test_message_falls_back_to_status_line() {
        assert_eq!(
            api_error_message(StatusCode::SERVICE_UNAVAILABLE, &json!("plain text")),
            "503 Service Unavailable"
        );
    }

    #[test]
    fn test_empty_errors_array_uses_status_line() {
        assert_eq!(
            api_error_message(StatusCode::BAD_REQUEST, &json!({"errors": []})),
            "400 Bad Request"
        );
    }
}
