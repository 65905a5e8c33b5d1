//! Configuration module
//!
//! Layered configuration loading from a TOML file, environment variables,
//! and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority, applied by the CLI layer)
//! 2. Environment variables (`DD_API_KEY`, `DD_APPLICATION_KEY`, `DD_SITE`,
//!    `DDEVENTS_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! The credentials are only ever checked for non-emptiness; whether they are
//! actually valid is the provider's call to make.

pub mod error;
pub mod logging;
pub mod server;
pub mod site;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use site::Site;

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Credentials and endpoint selection for the events client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Datadog API key (`DD-API-KEY` header).
    pub api_key: String,
    /// Datadog application key (`DD-APPLICATION-KEY` header).
    pub app_key: String,
    /// Provider region.
    pub site: Site,
    /// Base URL of the same-origin relay all calls are routed through.
    pub relay_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            app_key: String::new(),
            site: Site::default(),
            relay_url: "http://127.0.0.1:8090".to_string(),
        }
    }
}

impl ApiConfig {
    /// Both keys must be present before anything goes to the network.
    pub fn require_credentials(&self) -> Result<(), ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError::MissingField("api.api_key".to_string()));
        }
        if self.app_key.is_empty() {
            return Err(ConfigError::MissingField("api.app_key".to_string()));
        }
        Ok(())
    }
}

/// Unified configuration for the ddevents console.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Events API access
    pub api: ApiConfig,
    /// Relay server bind settings
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ConsoleConfig {
    /// Load configuration from a TOML file.
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(api_key) = std::env::var("DD_API_KEY") {
            self.api.api_key = api_key;
        }
        if let Ok(app_key) = std::env::var("DD_APPLICATION_KEY") {
            self.api.app_key = app_key;
        }
        if let Ok(site) = std::env::var("DD_SITE") {
            if let Ok(s) = site.parse() {
                self.api.site = s;
            }
        }
        if let Ok(relay_url) = std::env::var("DDEVENTS_RELAY_URL") {
            self.api.relay_url = relay_url;
        }

        if let Ok(port) = std::env::var("DDEVENTS_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("DDEVENTS_HOST") {
            self.server.host = host;
        }

        if let Ok(level) = std::env::var("DDEVENTS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("DDEVENTS_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }
}
