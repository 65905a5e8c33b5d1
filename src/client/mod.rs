//! # Instrumented events client
//!
//! Wraps the three Events API operations (create, list, get) with hooks
//! that record every outbound call in the shared [`RequestLog`].
//!
//! Before a call leaves, a pending [`RequestRecord`] is appended under a
//! fresh correlation id. When the call settles the same record is updated
//! in place; failures additionally append one [`ErrorRecord`] carrying the
//! derived human-readable message. Every call produces exactly one request
//! record; no retries, no duplicates.
//!
//! All calls are routed through the same-origin relay as
//! `{relay_url}?url=<target>`.

mod error;

pub use error::ClientError;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::events::{EventPayload, EventQuery};
use crate::logging::generate_request_id;
use crate::store::{ErrorRecord, RequestLog, RequestRecord, RequestStatus, RequestUpdate};

/// Client for the Datadog Events API, instrumented against a [`RequestLog`].
pub struct EventsClient {
    http: reqwest::Client,
    config: ApiConfig,
    log: Arc<RequestLog>,
}

impl EventsClient {
    pub fn new(config: ApiConfig, log: Arc<RequestLog>) -> Self {
        // No local timeout; the relay and transport defaults govern.
        let http = reqwest::Client::builder()
            .build()
            .expect("Failed to create HTTP client");
        Self { http, config, log }
    }

    /// The request log this client records into.
    pub fn log(&self) -> &Arc<RequestLog> {
        &self.log
    }

    /// Submit a composed event to the intake endpoint.
    pub async fn create_event(&self, payload: &EventPayload) -> Result<Value, ClientError> {
        self.config.require_credentials()?;
        let target = self.config.site.intake_url();
        let body = serde_json::json!({ "data": payload });
        self.execute(Method::POST, &target, Some(body)).await
    }

    /// Time-windowed, free-text event search.
    pub async fn list_events(&self, query: &EventQuery) -> Result<Value, ClientError> {
        self.config.require_credentials()?;
        let target = query
            .apply_to(&self.config.site.api_url())
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;
        self.execute(Method::GET, &target, None).await
    }

    /// Fetch a single event by id.
    pub async fn get_event(&self, event_id: &str) -> Result<Value, ClientError> {
        self.config.require_credentials()?;
        let target = format!("{}/{}", self.config.site.api_url(), event_id);
        self.execute(Method::GET, &target, None).await
    }

    /// One HTTP call through the relay, bracketed by the log hooks.
    async fn execute(
        &self,
        method: Method,
        target: &str,
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let id = generate_request_id();
        let started_at = Utc::now().timestamp_millis();
        let start = Instant::now();

        let mut builder = self
            .http
            .request(method.clone(), &self.config.relay_url)
            .query(&[("url", target)])
            .header(CONTENT_TYPE, "application/json")
            .header("DD-API-KEY", &self.config.api_key)
            .header("DD-APPLICATION-KEY", &self.config.app_key);
        if let Some(ref json) = body {
            builder = builder.json(json);
        }
        let request = builder
            .build()
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;

        self.log.append_request(RequestRecord::pending(
            id.clone(),
            method.to_string(),
            request.url().to_string(),
            header_map(request.headers()),
            body,
            started_at,
        ));

        match self.http.execute(request).await {
            Ok(response) => self.settle(&id, start, response).await,
            Err(e) => Err(self.settle_network_failure(&id, start, e)),
        }
    }

    /// Post-call hook: updates the pending record in place, and on failure
    /// appends an error record and derives the surfaced message.
    async fn settle(
        &self,
        id: &str,
        start: Instant,
        response: reqwest::Response,
    ) -> Result<Value, ClientError> {
        let status = response.status();
        let response_headers = header_map(response.headers());

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return Err(self.settle_network_failure(id, start, e)),
        };
        let value: Value = serde_json::from_str(&text).unwrap_or(Value::String(text));

        let duration_ms = start.elapsed().as_millis() as u64;
        let ended_at = Utc::now().timestamp_millis();

        if status.is_success() {
            self.log.update_request(
                id,
                RequestUpdate::success(
                    status.as_u16(),
                    Some(response_headers),
                    Some(value.clone()),
                    ended_at,
                    duration_ms,
                ),
            );
            return Ok(value);
        }

        let message = error::api_error_message(status, &value);
        tracing::debug!(request_id = %id, status = status.as_u16(), "API call failed");

        self.log.update_request(
            id,
            RequestUpdate::failure(
                RequestStatus::Http(status.as_u16()),
                Some(value.clone()),
                ended_at,
                duration_ms,
            ),
        );
        self.log.append_error(ErrorRecord {
            id: generate_request_id(),
            timestamp: ended_at,
            message: message.clone(),
            details: Some(value.clone()),
            status: Some(status.as_u16()),
        });

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
            details: Some(value),
        })
    }

    /// Failure hook for calls that never produced a response.
    fn settle_network_failure(&self, id: &str, start: Instant, e: reqwest::Error) -> ClientError {
        let duration_ms = start.elapsed().as_millis() as u64;
        let ended_at = Utc::now().timestamp_millis();
        tracing::debug!(request_id = %id, error = %e, "Request failed before a response arrived");

        self.log.update_request(
            id,
            RequestUpdate::failure(
                RequestStatus::Failed,
                Some(Value::String(error::NETWORK_ERROR_MESSAGE.to_string())),
                ended_at,
                duration_ms,
            ),
        );
        self.log.append_error(ErrorRecord {
            id: generate_request_id(),
            timestamp: ended_at,
            message: error::NETWORK_ERROR_MESSAGE.to_string(),
            details: None,
            status: None,
        });

        ClientError::Network(e)
    }
}

fn header_map(headers: &reqwest::header::HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or("<binary>").to_string(),
            )
        })
        .collect()
}
