//! ddevents - console for the Datadog Events API v2
//!
//! This library provides a same-origin relay for browser and CLI clients,
//! an instrumented HTTP client with a bounded request/error log, and the
//! payload composition and search plumbing for alert and change events.

pub mod cli;
pub mod client;
pub mod config;
pub mod events;
pub mod logging;
pub mod relay;
pub mod store;
