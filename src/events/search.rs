//! Event search and result normalization

use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use url::Url;

/// Page size requested from the search endpoint.
pub const PAGE_LIMIT: u32 = 10;

/// Fixed lookback presets for the search window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Lookback {
    #[value(name = "15m")]
    Minutes15,
    #[default]
    #[value(name = "1h")]
    Hours1,
    #[value(name = "4h")]
    Hours4,
    #[value(name = "1d")]
    Days1,
    #[value(name = "2d")]
    Days2,
    #[value(name = "1w")]
    Weeks1,
}

impl Lookback {
    pub fn as_millis(&self) -> i64 {
        match self {
            Lookback::Minutes15 => 15 * 60 * 1000,
            Lookback::Hours1 => 60 * 60 * 1000,
            Lookback::Hours4 => 4 * 60 * 60 * 1000,
            Lookback::Days1 => 24 * 60 * 60 * 1000,
            Lookback::Days2 => 2 * 24 * 60 * 60 * 1000,
            Lookback::Weeks1 => 7 * 24 * 60 * 60 * 1000,
        }
    }
}

/// A time-windowed, free-text event search.
#[derive(Debug, Clone)]
pub struct EventQuery {
    pub query: String,
    /// Window start, epoch milliseconds.
    pub from: i64,
    /// Window end, epoch milliseconds.
    pub to: i64,
    pub limit: u32,
    /// Opaque pagination token from a prior response.
    pub cursor: Option<String>,
}

impl EventQuery {
    /// Build a query covering `[now - lookback, now]`.
    pub fn over_lookback(query: impl Into<String>, lookback: Lookback, now_ms: i64) -> Self {
        Self {
            query: query.into(),
            from: now_ms - lookback.as_millis(),
            to: now_ms,
            limit: PAGE_LIMIT,
            cursor: None,
        }
    }

    pub fn with_cursor(mut self, cursor: Option<String>) -> Self {
        self.cursor = cursor;
        self
    }

    /// Query parameters in the provider's `filter[...]`/`page[...]` form.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("filter[query]", self.query.clone()),
            ("filter[from]", self.from.to_string()),
            ("filter[to]", self.to.to_string()),
            ("page[limit]", self.limit.to_string()),
        ];
        if let Some(ref cursor) = self.cursor {
            params.push(("page[cursor]", cursor.clone()));
        }
        params
    }

    /// Append the parameters to `base`, returning the full target URL.
    pub fn apply_to(&self, base: &str) -> Result<String, url::ParseError> {
        let mut url = Url::parse(base)?;
        for (key, value) in self.params() {
            url.query_pairs_mut().append_pair(key, &value);
        }
        Ok(url.into())
    }
}

/// Display-ready projection of one search result.
///
/// Search results are heterogeneous: depending on the event category the
/// interesting fields sit either directly under `attributes` or one level
/// deeper under `attributes.attributes`. The nested level wins when both
/// are present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSummary {
    pub id: Option<String>,
    pub title: String,
    pub message: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    pub tags: Vec<String>,
}

impl EventSummary {
    pub fn from_value(event: &Value) -> Self {
        let attrs = event.get("attributes").cloned().unwrap_or(Value::Null);
        let nested = attrs.get("attributes").cloned().unwrap_or(Value::Null);

        let str_field = |value: &Value, key: &str| -> Option<String> {
            value.get(key).and_then(Value::as_str).map(str::to_string)
        };

        let title = str_field(&nested, "title")
            .or_else(|| str_field(&attrs, "title"))
            .unwrap_or_else(|| "Untitled Event".to_string());

        let message = str_field(&nested, "message")
            .or_else(|| str_field(&nested, "text"))
            .or_else(|| str_field(&attrs, "text"))
            .or_else(|| str_field(&attrs, "message"))
            .unwrap_or_default();

        let status = str_field(&nested, "status")
            .or_else(|| str_field(&attrs, "status"))
            .or_else(|| str_field(&attrs, "alert_type"))
            .unwrap_or_else(|| "info".to_string());

        let timestamp = nested
            .get("timestamp")
            .filter(|v| !v.is_null())
            .or_else(|| attrs.get("timestamp").filter(|v| !v.is_null()))
            .cloned();

        let tags = nested
            .get("tags")
            .and_then(Value::as_array)
            .or_else(|| attrs.get("tags").and_then(Value::as_array))
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: event.get("id").and_then(Value::as_str).map(str::to_string),
            title,
            message,
            status,
            timestamp,
            tags,
        }
    }

    /// Extract the summaries from a full search response.
    pub fn from_response(response: &Value) -> Vec<Self> {
        response
            .get("data")
            .and_then(Value::as_array)
            .map(|events| events.iter().map(Self::from_value).collect())
            .unwrap_or_default()
    }
}

/// Pagination cursor for the next page, when the response carries one.
pub fn next_cursor(response: &Value) -> Option<String> {
    response
        .pointer("/meta/page/after")
        .and_then(Value::as_str)
        .map(str::to_string)
}
