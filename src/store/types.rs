//! Record types held by the request log

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::Serializer;
use serde::Serialize;
use serde_json::Value;

/// Lifecycle state of a logged request.
///
/// A record is created `Pending` and settles exactly once, either to the
/// upstream HTTP status or to `Failed` when no response was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Http(u16),
    Failed,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Http(code) => write!(f, "{}", code),
            RequestStatus::Failed => write!(f, "error"),
        }
    }
}

impl Serialize for RequestStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RequestStatus::Pending => serializer.serialize_str("pending"),
            RequestStatus::Http(code) => serializer.serialize_u16(*code),
            RequestStatus::Failed => serializer.serialize_str("error"),
        }
    }
}

/// One outbound API call, as shown in the request inspector.
#[derive(Debug, Clone, Serialize)]
pub struct RequestRecord {
    pub id: String,
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_body: Option<Value>,
    pub started_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    pub error: bool,
}

impl RequestRecord {
    /// Creates a record in the pending state, before the call leaves.
    pub fn pending(
        id: String,
        method: String,
        url: String,
        headers: BTreeMap<String, String>,
        body: Option<Value>,
        started_at: i64,
    ) -> Self {
        Self {
            id,
            method,
            url,
            headers,
            body,
            status: RequestStatus::Pending,
            response_headers: None,
            response_body: None,
            started_at,
            ended_at: None,
            duration_ms: None,
            error: false,
        }
    }

    /// Merges a settling update into the record.
    pub fn apply(&mut self, update: RequestUpdate) {
        self.status = update.status;
        if update.response_headers.is_some() {
            self.response_headers = update.response_headers;
        }
        if update.response_body.is_some() {
            self.response_body = update.response_body;
        }
        self.ended_at = Some(update.ended_at);
        self.duration_ms = Some(update.duration_ms);
        self.error = update.error;
    }
}

/// Fields merged into a [`RequestRecord`] when its call settles.
#[derive(Debug, Clone)]
pub struct RequestUpdate {
    pub status: RequestStatus,
    pub response_headers: Option<BTreeMap<String, String>>,
    pub response_body: Option<Value>,
    pub ended_at: i64,
    pub duration_ms: u64,
    pub error: bool,
}

impl RequestUpdate {
    pub fn success(
        status: u16,
        response_headers: Option<BTreeMap<String, String>>,
        response_body: Option<Value>,
        ended_at: i64,
        duration_ms: u64,
    ) -> Self {
        Self {
            status: RequestStatus::Http(status),
            response_headers,
            response_body,
            ended_at,
            duration_ms,
            error: false,
        }
    }

    pub fn failure(
        status: RequestStatus,
        response_body: Option<Value>,
        ended_at: i64,
        duration_ms: u64,
    ) -> Self {
        Self {
            status,
            response_headers: None,
            response_body,
            ended_at,
            duration_ms,
            error: true,
        }
    }
}

/// One failed call, as shown in the debug console's error list.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub id: String,
    pub timestamp: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(RequestStatus::Pending.to_string(), "pending");
        assert_eq!(RequestStatus::Http(201).to_string(), "201");
        assert_eq!(RequestStatus::Failed.to_string(), "error");
    }

    #[test]
    fn test_status_serializes_like_the_inspector_expects() {
        assert_eq!(
            serde_json::to_value(RequestStatus::Pending).unwrap(),
            Value::String("pending".to_string())
        );
        assert_eq!(
            serde_json::to_value(RequestStatus::Http(403)).unwrap(),
            serde_json::json!(403)
        );
        assert_eq!(
            serde_json::to_value(RequestStatus::Failed).unwrap(),
            Value::String("error".to_string())
        );
    }

    #[test]
    fn test_pending_record_defaults() {
        let record = RequestRecord::pending(
            "id".to_string(),
            "POST".to_string(),
            "http://relay/?url=x".to_string(),
            BTreeMap::new(),
            Some(serde_json::json!({"data": {}})),
            42,
        );
        assert_eq!(record.status, RequestStatus::Pending);
        assert!(record.ended_at.is_none());
        assert!(record.duration_ms.is_none());
        assert!(!record.error);
    }

    #[test]
    fn test_apply_failure_keeps_request_side() {
        let mut record = RequestRecord::pending(
            "id".to_string(),
            "POST".to_string(),
            "http://relay/?url=x".to_string(),
            BTreeMap::new(),
            None,
            42,
        );
        record.apply(RequestUpdate::failure(
            RequestStatus::Http(403),
            Some(Value::String("denied".to_string())),
            100,
            58,
        ));

        assert_eq!(record.status, RequestStatus::Http(403));
        assert!(record.error);
        assert_eq!(record.method, "POST");
        assert_eq!(record.response_body, Some(Value::String("denied".to_string())));
    }
}
