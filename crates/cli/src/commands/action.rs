//! `bizpilot action` and `bizpilot actions`: preset actions.

use std::path::Path;

use bizpilot_agent::{BusinessAgent, build_query, catalog};
use serde_json::{Map, Value};

pub async fn run(
    config_path: Option<&Path>,
    name: &str,
    params: &[String],
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let params = parse_params(params)?;
    let query = build_query(name, &params)?;

    let config = super::load_config(config_path)?;
    let agent = BusinessAgent::from_config(&config)?;

    let response = agent.process(&query).await;
    super::print_response(&response, json)
}

pub fn list() {
    println!("🧭 Preset Actions");
    println!("─────────────────────────────────────────────────────────────────");
    println!("{:<20} {:<12} {:<12} {:<14} {}", "Action", "Regime", "Domain", "Format", "Required");

    for info in catalog() {
        let required = if info.required_fields.is_empty() {
            "-".to_string()
        } else {
            info.required_fields.join(", ")
        };
        println!(
            "{:<20} {:<12} {:<12} {:<14} {}",
            info.action.as_str(),
            info.regime.as_str(),
            info.domain.as_str(),
            info.output_format.as_str(),
            required
        );
        println!("    {}", info.description);
    }

    println!();
    println!("  Any other name runs a generic query from --param task=...");
}

/// Turn `key=value` pairs into a JSON object.
///
/// Values that parse as JSON (numbers, booleans, objects) keep their type;
/// anything else is a string.
fn parse_params(pairs: &[String]) -> Result<Value, String> {
    let mut map = Map::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| format!("Expected KEY=VALUE, got '{pair}'"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("Empty parameter name in '{pair}'"));
        }
        let value = serde_json::from_str::<Value>(raw)
            .ok()
            .filter(|v| !v.is_string() && !v.is_null())
            .unwrap_or_else(|| Value::String(raw.to_string()));
        map.insert(key.to_string(), value);
    }
    Ok(Value::Object(map))
}
