pub mod action;
pub mod ask;
pub mod config_cmd;
pub mod estimate;
pub mod serve;

use std::path::Path;

use bizpilot_config::{AppConfig, ConfigError};
use bizpilot_core::{BusinessResponse, ResponseBody};

/// Load the config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => AppConfig::load_with_env(path),
        None => AppConfig::load(),
    }
}

/// Print a response for a human, or as pretty JSON.
pub fn print_response(response: &BusinessResponse, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
        return Ok(());
    }

    match &response.body {
        ResponseBody::Json { data } => println!("{}", serde_json::to_string_pretty(data)?),
        _ => println!("{}", response.response),
    }

    if !response.action_items.is_empty() {
        println!();
        println!("Action items:");
        for (i, item) in response.action_items.iter().enumerate() {
            println!("  {}. {item}", i + 1);
        }
    }

    if !response.metrics.is_empty() {
        println!();
        println!("Metrics:");
        for (name, value) in &response.metrics {
            println!("  {name:<20} {value}");
        }
    }

    println!();
    println!("─────────────────────────────────────");
    println!(
        "  regime: {}  confidence: {:.2}  tokens: {}  cost: ${:.6}",
        response.regime, response.confidence, response.tokens_used, response.cost
    );

    Ok(())
}
