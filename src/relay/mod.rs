//! # Same-origin relay
//!
//! A stateless forwarding server for the Datadog Events API. Browsers (and
//! this crate's own client) cannot call the API cross-origin, so every call
//! goes through `GET|POST /?url=<target>` here instead.
//!
//! The relay:
//!
//! - validates the target host against the Datadog domain families
//!   ([`validator`]), refusing everything else with a structured 403;
//! - forwards only an allowlisted subset of inbound headers, so neither
//!   ambient hosting headers nor caller-injected ones reach the upstream;
//! - mirrors the upstream status, body, and content type verbatim;
//! - stamps permissive CORS headers on every response, preflights included.
//!
//! CORS is deliberately `*`: the domain allowlist is the security boundary,
//! not the origin check.

pub mod proxy;
pub mod validator;

pub use validator::is_allowed;

use std::sync::Arc;

use axum::routing::any;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Shared state for relay handlers.
pub struct RelayState {
    pub http: reqwest::Client,
}

impl RelayState {
    pub fn new() -> Self {
        // No local timeout: whatever the client stack defaults to governs.
        let http = reqwest::Client::builder()
            .build()
            .expect("Failed to create HTTP client");
        Self::with_client(http)
    }

    /// Build state around a preconfigured client, e.g. with DNS overrides.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Default for RelayState {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the relay router. All methods land on the same handler; the
/// method split (OPTIONS versus forwarding) happens inside it.
pub fn create_router(state: Arc<RelayState>) -> Router {
    Router::new()
        .route("/", any(proxy::handle))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
