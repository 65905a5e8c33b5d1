//! Prefilled event templates
//!
//! The quick-start presets from the original console form, submittable
//! directly via `ddevents event template <name>`.

use clap::ValueEnum;

use super::payload::{
    parse_value_or_text, ChangedResource, EventPayload, Priority, Severity,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Template {
    /// A successful production deployment alert
    DeploymentSuccess,
    /// A high-error-rate alert
    ErrorAlert,
    /// A feature flag change event
    FeatureFlagUpdate,
    /// A database configuration change event
    ConfigChange,
}

impl Template {
    pub fn name(&self) -> &'static str {
        match self {
            Template::DeploymentSuccess => "Deployment Success",
            Template::ErrorAlert => "Error Alert",
            Template::FeatureFlagUpdate => "Feature Flag Update",
            Template::ConfigChange => "Config Change",
        }
    }

    pub fn payload(&self) -> EventPayload {
        match self {
            Template::DeploymentSuccess => EventPayload::alert(
                "Deployment Successful: v1.2.3",
                "The deployment to production was successful.",
                vec![
                    "env:prod".to_string(),
                    "service:web-app".to_string(),
                    "version:v1.2.3".to_string(),
                ],
                Severity::Success,
                Priority::P3,
            ),
            Template::ErrorAlert => EventPayload::alert(
                "High Error Rate Detected",
                "Error rate exceeded 5% in the last 5 minutes.",
                vec![
                    "env:prod".to_string(),
                    "service:payment-api".to_string(),
                    "severity:high".to_string(),
                ],
                Severity::Error,
                Priority::P1,
            ),
            Template::FeatureFlagUpdate => EventPayload::change(
                "Feature Flag Updated: payment_processed",
                "payment_processed feature flag has been enabled",
                vec!["env:prod".to_string(), "team:payments".to_string()],
                ChangedResource {
                    name: "payment_processed".to_string(),
                    kind: "feature_flag".to_string(),
                },
                parse_value_or_text(r#"{"enabled": true, "percentage": 50}"#),
                parse_value_or_text(r#"{"enabled": false}"#),
            ),
            Template::ConfigChange => EventPayload::change(
                "Database Config Changed",
                "Increased max_connections from 100 to 200",
                vec!["env:prod".to_string(), "service:db".to_string()],
                ChangedResource {
                    name: "postgres.conf".to_string(),
                    kind: "configuration".to_string(),
                },
                parse_value_or_text(r#"{"max_connections": 200}"#),
                parse_value_or_text(r#"{"max_connections": 100}"#),
            ),
        }
    }
}
