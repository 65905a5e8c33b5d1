//! Event payload composition
//!
//! Builds the `{type: "event", attributes: {...}}` body the v2 intake
//! endpoint expects, for the two supported categories. The client wraps the
//! payload in the outer `{"data": ...}` envelope on submission.

use clap::ValueEnum;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Integration id stamped on every composed event.
pub const INTEGRATION_ID: &str = "custom-events";

/// User-facing severity of an alert event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// Provider-side alert status. Four severities fold into three statuses:
/// info and success both report as ok.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Ok,
    Warn,
    Error,
}

impl From<Severity> for EventStatus {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Info | Severity::Success => EventStatus::Ok,
            Severity::Warning => EventStatus::Warn,
            Severity::Error => EventStatus::Error,
        }
    }
}

/// Alert priority, serialized as the string "1".."5" the intake expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Priority {
    #[value(name = "1")]
    P1,
    #[value(name = "2")]
    P2,
    #[default]
    #[value(name = "3")]
    P3,
    #[value(name = "4")]
    P4,
    #[value(name = "5")]
    P5,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::P1 => "1",
            Priority::P2 => "2",
            Priority::P3 => "3",
            Priority::P4 => "4",
            Priority::P5 => "5",
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Alert,
    Change,
}

/// Category-specific nested attributes.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CategoryDetails {
    Alert(AlertDetails),
    Change(ChangeDetails),
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertDetails {
    pub priority: Priority,
    pub status: EventStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangedResource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangeDetails {
    pub changed_resource: ChangedResource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_value: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventAttributes {
    pub title: String,
    pub message: String,
    pub tags: Vec<String>,
    pub category: EventCategory,
    pub integration_id: &'static str,
    pub attributes: CategoryDetails,
}

/// A composed event, ready for submission.
#[derive(Debug, Clone, Serialize)]
pub struct EventPayload {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub attributes: EventAttributes,
}

impl EventPayload {
    pub fn alert(
        title: impl Into<String>,
        message: impl Into<String>,
        tags: Vec<String>,
        severity: Severity,
        priority: Priority,
    ) -> Self {
        Self::compose(
            title,
            message,
            tags,
            EventCategory::Alert,
            CategoryDetails::Alert(AlertDetails {
                priority,
                status: severity.into(),
            }),
        )
    }

    pub fn change(
        title: impl Into<String>,
        message: impl Into<String>,
        tags: Vec<String>,
        resource: ChangedResource,
        new_value: Option<Value>,
        prev_value: Option<Value>,
    ) -> Self {
        Self::compose(
            title,
            message,
            tags,
            EventCategory::Change,
            CategoryDetails::Change(ChangeDetails {
                changed_resource: resource,
                new_value,
                prev_value,
            }),
        )
    }

    fn compose(
        title: impl Into<String>,
        message: impl Into<String>,
        tags: Vec<String>,
        category: EventCategory,
        attributes: CategoryDetails,
    ) -> Self {
        Self {
            kind: "event",
            attributes: EventAttributes {
                title: title.into(),
                message: message.into(),
                tags,
                category,
                integration_id: INTEGRATION_ID,
                attributes,
            },
        }
    }

    pub fn category(&self) -> EventCategory {
        self.attributes.category
    }
}

/// Interpret free text as JSON when it parses, otherwise carry it through
/// as a plain string. Empty input yields nothing. Parse failure is a
/// fallback representation, not an error.
pub fn parse_value_or_text(input: &str) -> Option<Value> {
    if input.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(input) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(input.to_string())),
    }
}
