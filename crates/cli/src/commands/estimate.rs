//! `bizpilot estimate`: output-token ceilings and worst-case cost.

use std::path::Path;

use bizpilot_config::AppConfig;
use bizpilot_core::{OutputFormat, Urgency};
use bizpilot_telemetry::{TokenRate, UsageLedger};

/// One row of the estimate table.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub format: OutputFormat,
    pub max_tokens: u32,
    pub worst_case_cost: f64,
}

pub fn estimates(config: &AppConfig, format: Option<OutputFormat>, urgency: Option<Urgency>) -> Vec<Estimate> {
    let rate = TokenRate::new(config.pricing.usd_per_million_tokens);
    let ledger = UsageLedger::new(config.agent.token_budget, rate)
        .with_max_output_tokens(config.agent.max_output_tokens);

    let formats = match format {
        Some(format) => vec![format],
        None => OutputFormat::ALL.to_vec(),
    };

    formats
        .into_iter()
        .map(|format| {
            let max_tokens = ledger.estimate_output_tokens(format, urgency);
            Estimate {
                format,
                max_tokens,
                worst_case_cost: rate.cost_of_estimate(max_tokens),
            }
        })
        .collect()
}

pub fn run(
    config_path: Option<&Path>,
    format: Option<OutputFormat>,
    urgency: Option<Urgency>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let urgency_label = urgency.map(|u| u.as_str()).unwrap_or("unspecified");

    println!("💰 Output Token Ceilings (urgency: {urgency_label})");
    println!("─────────────────────────────────────────────");
    println!("{:<16} {:>10} {:>14}", "Format", "Max tokens", "Worst case");

    for e in estimates(&config, format, urgency) {
        println!(
            "{:<16} {:>10} ${:>13.6}",
            e.format.as_str(),
            e.max_tokens,
            e.worst_case_cost
        );
    }

    println!();
    println!(
        "  ${:.2} per 1M tokens, budget {} tokens (advisory)",
        config.pricing.usd_per_million_tokens, config.agent.token_budget
    );

    Ok(())
}
