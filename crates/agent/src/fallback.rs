//! Canned responses for the two paths that skip the model.

use std::collections::BTreeMap;

use bizpilot_core::{BusinessResponse, Regime, ResponseBody};

pub const FALLBACK_CONFIDENCE: f64 = 0.3;

fn next_step(regime: Regime) -> &'static str {
    match regime {
        Regime::Support => "Proceed with the standard procedure for this task.",
        Regime::Exploration => "Explore the available data directly while the assistant recovers.",
        Regime::Balanced => "Coordinate the team response using current information.",
    }
}

/// Returned when the completion call fails or times out.
pub fn fallback_response(regime: Regime) -> BusinessResponse {
    let text = format!(
        "I could not reach the analysis service just now, so this answer is not based on a fresh analysis.\n\n\
         Recommended action: {}",
        next_step(regime)
    );
    let action_items = vec![
        "Retry the request in a moment".to_string(),
        "Check system status if the problem persists".to_string(),
    ];

    BusinessResponse {
        body: ResponseBody::text(text.clone()),
        response: text,
        regime,
        confidence: FALLBACK_CONFIDENCE,
        action_items,
        metrics: BTreeMap::new(),
        tokens_used: 0,
        cost: 0.0,
        amplification: regime.amplification(),
    }
}

/// Returned without calling the model when the recent-query window is full.
pub fn overload_response(recent: usize, window_secs: u64) -> BusinessResponse {
    let text = format!(
        "Received {recent} requests in the last {window_secs} seconds. Requests are being \
         handled in order; please allow a moment before sending more."
    );
    let regime = Regime::Balanced;

    BusinessResponse {
        body: ResponseBody::text(text.clone()),
        response: text,
        regime,
        confidence: 1.0,
        action_items: vec!["Processing all requests in order".to_string()],
        metrics: BTreeMap::new(),
        tokens_used: 0,
        cost: 0.0,
        amplification: regime.amplification(),
    }
}
