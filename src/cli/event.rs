//! Event command handlers

use std::error::Error;
use std::sync::Arc;

use chrono::Utc;
use colored::Colorize;

use super::output;
use super::{AlertArgs, ChangeArgs, ClientArgs, GetArgs, ListArgs, TemplateArgs};
use crate::client::EventsClient;
use crate::config::ConsoleConfig;
use crate::events::{
    next_cursor, parse_value_or_text, ChangedResource, EventPayload, EventQuery, EventSummary,
};
use crate::store::RequestLog;

/// Handle `ddevents event alert`
pub async fn handle_alert(args: &AlertArgs) -> Result<(), Box<dyn Error>> {
    let payload = EventPayload::alert(
        args.title.clone(),
        args.message.clone(),
        args.tags.clone(),
        args.severity,
        args.priority,
    );
    submit(&args.client, payload).await
}

/// Handle `ddevents event change`
pub async fn handle_change(args: &ChangeArgs) -> Result<(), Box<dyn Error>> {
    let payload = EventPayload::change(
        args.title.clone(),
        args.message.clone(),
        args.tags.clone(),
        ChangedResource {
            name: args.resource_name.clone(),
            kind: args.resource_type.clone(),
        },
        args.new_value.as_deref().and_then(parse_value_or_text),
        args.prev_value.as_deref().and_then(parse_value_or_text),
    );
    submit(&args.client, payload).await
}

/// Handle `ddevents event template`
pub async fn handle_template(args: &TemplateArgs) -> Result<(), Box<dyn Error>> {
    println!("Submitting template: {}", args.name.name());
    submit(&args.client, args.name.payload()).await
}

/// Handle `ddevents event list`
pub async fn handle_list(args: &ListArgs) -> Result<(), Box<dyn Error>> {
    let client = build_client(&args.client)?;
    let now = Utc::now().timestamp_millis();
    let query = EventQuery::over_lookback(args.query.clone(), args.lookback, now)
        .with_cursor(args.cursor.clone());

    let outcome = match client.list_events(&query).await {
        Ok(response) => {
            if args.json {
                println!("{}", output::format_json(&response));
            } else {
                let summaries = EventSummary::from_response(&response);
                if summaries.is_empty() {
                    println!("No events found.");
                } else {
                    println!("{}", output::format_events_table(&summaries));
                }
                if let Some(cursor) = next_cursor(&response) {
                    println!("Next page: --cursor {}", cursor);
                }
            }
            Ok(())
        }
        Err(e) => Err(e.into()),
    };

    dump_log_if_requested(&args.client, client.log());
    outcome
}

/// Handle `ddevents event get`
pub async fn handle_get(args: &GetArgs) -> Result<(), Box<dyn Error>> {
    let client = build_client(&args.client)?;

    let outcome = match client.get_event(&args.id).await {
        Ok(response) => {
            if args.json {
                println!("{}", output::format_json(&response));
            } else {
                let event = response.get("data").cloned().unwrap_or(response.clone());
                let summary = EventSummary::from_value(&event);
                println!("{}", output::format_event_detail(&summary, &event));
            }
            Ok(())
        }
        Err(e) => Err(e.into()),
    };

    dump_log_if_requested(&args.client, client.log());
    outcome
}

/// Create an event via the shared submission path.
async fn submit(client_args: &ClientArgs, payload: EventPayload) -> Result<(), Box<dyn Error>> {
    let client = build_client(client_args)?;

    let outcome = match client.create_event(&payload).await {
        Ok(response) => {
            println!("{} Event created", "✓".green());
            if let Some(id) = response.pointer("/data/id").and_then(|v| v.as_str()) {
                println!("  id: {}", id);
            }
            Ok(())
        }
        Err(e) => Err(e.into()),
    };

    dump_log_if_requested(client_args, client.log());
    outcome
}

/// Load config (file, then env, then CLI overrides) and build a client with
/// its own request log.
fn build_client(args: &ClientArgs) -> Result<EventsClient, Box<dyn Error>> {
    let mut config = if args.config.exists() {
        ConsoleConfig::load(Some(&args.config))?
    } else {
        ConsoleConfig::default()
    };
    config = config.with_env_overrides();

    if let Some(site) = args.site {
        config.api.site = site;
    }
    if let Some(ref relay_url) = args.relay_url {
        config.api.relay_url = relay_url.clone();
    }

    Ok(EventsClient::new(config.api, Arc::new(RequestLog::new())))
}

fn dump_log_if_requested(args: &ClientArgs, log: &RequestLog) {
    if !args.debug {
        return;
    }
    println!();
    println!("{}", "Request log".bold());
    println!("{}", output::format_request_log(&log.requests()));
    let errors = log.errors();
    if !errors.is_empty() {
        println!("{}", "Error log".bold());
        println!("{}", output::format_error_log(&errors));
    }
}
