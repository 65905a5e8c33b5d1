//! CLI module
//!
//! Command-line interface definitions and handlers for the ddevents console.
//!
//! # Commands
//!
//! - `serve` - Run the same-origin relay server
//! - `event alert` / `event change` - Compose and submit an event
//! - `event template` - Submit a prefilled template event
//! - `event list` / `event get` - Browse recent events
//! - `config init` - Write a starter configuration file
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Run the relay
//! ddevents serve --port 8090
//!
//! # Submit an alert through it
//! ddevents event alert --title "Deploy started" --message "v1.2.3" \
//!     --severity info --tag env:prod
//!
//! # Browse the last four hours, with the request log
//! ddevents event list "status:error" --lookback 4h --debug
//! ```

pub mod completions;
pub mod config;
pub mod event;
pub mod output;
pub mod serve;

pub use completions::handle_completions;
pub use config::handle_config_init;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Site;
use crate::events::{Lookback, Priority, Severity, Template};

/// ddevents - console for the Datadog Events API
#[derive(Parser, Debug)]
#[command(name = "ddevents", version, about = "Console for the Datadog Events API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the same-origin relay server
    Serve(ServeArgs),
    /// Create and browse events
    #[command(subcommand)]
    Event(EventCommands),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "ddevents.toml")]
    pub config: PathBuf,

    /// Override relay port
    #[arg(short, long, env = "DDEVENTS_PORT")]
    pub port: Option<u16>,

    /// Override relay host
    #[arg(short = 'H', long, env = "DDEVENTS_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "DDEVENTS_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum EventCommands {
    /// Create an alert event
    Alert(AlertArgs),
    /// Create a change event
    Change(ChangeArgs),
    /// Submit a prefilled template event
    Template(TemplateArgs),
    /// Search recent events
    List(ListArgs),
    /// Fetch a single event by id
    Get(GetArgs),
}

/// Options shared by every client command.
#[derive(Args, Debug)]
pub struct ClientArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "ddevents.toml")]
    pub config: PathBuf,

    /// Datadog site override
    #[arg(long, env = "DD_SITE")]
    pub site: Option<Site>,

    /// Relay base URL override
    #[arg(long, env = "DDEVENTS_RELAY_URL")]
    pub relay_url: Option<String>,

    /// Print the request and error logs after the call
    #[arg(long)]
    pub debug: bool,
}

#[derive(Args, Debug)]
pub struct AlertArgs {
    #[command(flatten)]
    pub client: ClientArgs,

    /// Event title
    #[arg(long)]
    pub title: String,

    /// Message body (Markdown allowed)
    #[arg(long)]
    pub message: String,

    /// Severity shown in the event stream
    #[arg(long, value_enum, default_value_t = Severity::Info)]
    pub severity: Severity,

    /// Priority, 1 (critical) to 5 (info)
    #[arg(long, value_enum, default_value_t = Priority::P3)]
    pub priority: Priority,

    /// Tag in key:value form; repeatable
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ChangeArgs {
    #[command(flatten)]
    pub client: ClientArgs,

    /// Event title
    #[arg(long)]
    pub title: String,

    /// Message body (Markdown allowed)
    #[arg(long)]
    pub message: String,

    /// Name of the changed resource
    #[arg(long)]
    pub resource_name: String,

    /// Type of the changed resource (e.g. feature_flag)
    #[arg(long)]
    pub resource_type: String,

    /// New value, JSON if it parses, plain text otherwise
    #[arg(long)]
    pub new_value: Option<String>,

    /// Previous value, JSON if it parses, plain text otherwise
    #[arg(long)]
    pub prev_value: Option<String>,

    /// Tag in key:value form; repeatable
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Args, Debug)]
pub struct TemplateArgs {
    #[command(flatten)]
    pub client: ClientArgs,

    /// Template to submit
    #[arg(value_enum)]
    pub name: Template,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub client: ClientArgs,

    /// Free-text search query (e.g. "status:error service:web")
    #[arg(default_value = "")]
    pub query: String,

    /// Search window ending now
    #[arg(long, value_enum, default_value_t = Lookback::Hours1)]
    pub lookback: Lookback,

    /// Pagination cursor from a previous page
    #[arg(long)]
    pub cursor: Option<String>,

    /// Output raw JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub client: ClientArgs,

    /// Event id
    pub id: String,

    /// Output raw JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a starter configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output path
    #[arg(short, long, default_value = "ddevents.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_alert_command() {
        let cli = Cli::parse_from([
            "ddevents", "event", "alert", "--title", "t", "--message", "m", "--severity",
            "warning", "--priority", "1", "--tag", "env:prod", "--tag", "team:sre",
        ]);
        match cli.command {
            Commands::Event(EventCommands::Alert(args)) => {
                assert_eq!(args.title, "t");
                assert_eq!(args.severity, Severity::Warning);
                assert_eq!(args.priority, Priority::P1);
                assert_eq!(args.tags, vec!["env:prod", "team:sre"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_with_lookback() {
        let cli = Cli::parse_from(["ddevents", "event", "list", "status:error", "--lookback", "1w"]);
        match cli.command {
            Commands::Event(EventCommands::List(args)) => {
                assert_eq!(args.query, "status:error");
                assert_eq!(args.lookback, Lookback::Weeks1);
                assert!(!args.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_site_override() {
        let cli = Cli::parse_from([
            "ddevents", "event", "get", "ev-1", "--site", "datadoghq.eu",
        ]);
        match cli.command {
            Commands::Event(EventCommands::Get(args)) => {
                assert_eq!(args.client.site, Some(Site::Eu));
                assert_eq!(args.id, "ev-1");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
