//! Output formatting helpers for CLI commands

use chrono::DateTime;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::Value;

use crate::events::EventSummary;
use crate::store::{ErrorRecord, RequestRecord, RequestStatus};

/// Format event summaries as a table.
pub fn format_events_table(events: &[EventSummary]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Title", "Status", "Time", "Tags", "Message"]);

    for event in events {
        table.add_row(vec![
            Cell::new(&event.title),
            Cell::new(colorize_status(&event.status)),
            Cell::new(format_timestamp(event.timestamp.as_ref())),
            Cell::new(format_tags(&event.tags)),
            Cell::new(truncate(&event.message, 60)),
        ]);
    }

    table.to_string()
}

/// Format a single event with its raw response body.
pub fn format_event_detail(summary: &EventSummary, raw: &Value) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} [{}]\n",
        summary.title.bold(),
        colorize_status(&summary.status)
    ));
    out.push_str(&format!("Time: {}\n", format_timestamp(summary.timestamp.as_ref())));
    if !summary.tags.is_empty() {
        out.push_str(&format!("Tags: {}\n", summary.tags.join(", ")));
    }
    if !summary.message.is_empty() {
        out.push_str(&format!("\n{}\n", summary.message));
    }
    out.push_str(&format!("\n{}\n{}\n", "Raw event:".dimmed(), format_json(raw)));
    out
}

/// Format the request log as a table, newest first.
pub fn format_request_log(requests: &[RequestRecord]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Method", "Status", "Duration", "URL"]);

    for record in requests {
        table.add_row(vec![
            Cell::new(&record.method),
            Cell::new(colorize_request_status(record)),
            Cell::new(match record.duration_ms {
                Some(ms) => format!("{}ms", ms),
                None => "-".to_string(),
            }),
            Cell::new(truncate(&record.url, 80)),
        ]);
    }

    table.to_string()
}

/// Format the error log as a table, newest first.
pub fn format_error_log(errors: &[ErrorRecord]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Status", "Message"]);

    for record in errors {
        table.add_row(vec![
            Cell::new(format_epoch_ms(record.timestamp)),
            Cell::new(match record.status {
                Some(status) => status.to_string(),
                None => "-".to_string(),
            }),
            Cell::new(&record.message),
        ]);
    }

    table.to_string()
}

/// Pretty-printed JSON.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap()
}

fn colorize_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "error" => status.red().to_string(),
        "warn" | "warning" => status.yellow().to_string(),
        "success" | "ok" => status.green().to_string(),
        "info" => status.blue().to_string(),
        _ => status.to_string(),
    }
}

fn colorize_request_status(record: &RequestRecord) -> String {
    let text = record.status.to_string();
    match record.status {
        RequestStatus::Pending => text.yellow().to_string(),
        RequestStatus::Http(code) if code < 400 && !record.error => text.green().to_string(),
        _ => text.red().to_string(),
    }
}

/// Render a timestamp that may be epoch milliseconds or an ISO string.
fn format_timestamp(timestamp: Option<&Value>) -> String {
    match timestamp {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(format_epoch_ms)
            .unwrap_or_else(|| n.to_string()),
        Some(Value::String(s)) => s.clone(),
        _ => "-".to_string(),
    }
}

fn format_epoch_ms(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}

fn format_tags(tags: &[String]) -> String {
    let shown: Vec<&str> = tags.iter().take(3).map(String::as_str).collect();
    let rest = tags.len().saturating_sub(shown.len());
    let mut out = shown.join(", ");
    if rest > 0 {
        out.push_str(&format!(" (+{})", rest));
    }
    out
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}…", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_timestamp_variants() {
        assert_eq!(
            format_timestamp(Some(&json!(1_700_000_000_000i64))),
            "2023-11-14 22:13:20"
        );
        assert_eq!(
            format_timestamp(Some(&json!("2024-05-01T10:00:00Z"))),
            "2024-05-01T10:00:00Z"
        );
        assert_eq!(format_timestamp(None), "-");
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééé", 3), "ééé…");
    }

    #[test]
    fn test_format_tags_caps_at_three() {
        let tags: Vec<String> = (0..5).map(|i| format!("t{}", i)).collect();
        assert_eq!(format_tags(&tags), "t0, t1, t2 (+2)");
        assert_eq!(format_tags(&tags[..2]), "t0, t1");
    }

    #[test]
    fn test_events_table_contains_fields() {
        let summary = EventSummary {
            id: Some("ev-1".to_string()),
            title: "Deploy finished".to_string(),
            message: "all good".to_string(),
            status: "ok".to_string(),
            timestamp: None,
            tags: vec!["env:prod".to_string()],
        };
        let table = format_events_table(&[summary]);
        assert!(table.contains("Deploy finished"));
        assert!(table.contains("env:prod"));
    }
}
