//! Serve command implementation

use std::error::Error;
use std::sync::Arc;

use crate::cli::ServeArgs;
use crate::config::ConsoleConfig;
use crate::relay::{create_router, RelayState};

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(args: &ServeArgs) -> Result<ConsoleConfig, Box<dyn Error>> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        ConsoleConfig::load(Some(&args.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        ConsoleConfig::default()
    };

    // Apply environment variable overrides
    config = config.with_env_overrides();

    // Apply CLI overrides (highest priority)
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    Ok(config)
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}

/// Main serve command handler
pub async fn run_serve(args: ServeArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config_with_overrides(&args)?;

    crate::logging::init_tracing(&config.logging)?;

    tracing::info!("Starting ddevents relay");

    let state = Arc::new(RelayState::new());
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Relay stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_serve_config_loading() {
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[server]\nport = 9090").unwrap();

        let args = ServeArgs {
            config: temp.path().to_path_buf(),
            port: None,
            host: None,
            log_level: None,
        };

        let config = load_config_with_overrides(&args).unwrap();
        assert_eq!(config.server.port, 9090);
    }

    #[tokio::test]
    async fn test_serve_cli_overrides_config() {
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[server]\nport = 9090").unwrap();

        let args = ServeArgs {
            config: temp.path().to_path_buf(),
            port: Some(9999), // Override
            host: Some("127.0.0.1".to_string()),
            log_level: None,
        };

        let config = load_config_with_overrides(&args).unwrap();
        assert_eq!(config.server.port, 9999); // CLI wins
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[tokio::test]
    async fn test_serve_works_without_config_file() {
        let args = ServeArgs {
            config: PathBuf::from("nonexistent.toml"),
            port: None,
            host: None,
            log_level: None,
        };

        let config = load_config_with_overrides(&args).unwrap();
        assert_eq!(config.server.port, 8090); // Default
    }
}
