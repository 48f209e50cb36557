//! Data types reported by the telemetry subsystem.

use serde::{Deserialize, Serialize};

/// Usage against the token budget.
///
/// Serialized as `{ tokensUsed, tokensRemaining, percentUsed, estimatedCost }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    pub tokens_used: u64,
    /// Negative once the budget is exceeded
    pub tokens_remaining: i64,
    pub percent_used: f64,
    /// USD
    pub estimated_cost: f64,
}

/// Current load as seen by the recent-query log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadStatus {
    pub recent_queries: usize,
    pub high_load: bool,
    pub window_secs: u64,
    pub threshold: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_stats_wire_names() {
        let stats = UsageStats {
            tokens_used: 10_500,
            tokens_remaining: -500,
            percent_used: 105.0,
            estimated_cost: 0.0084,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["tokensUsed"], 10_500);
        assert_eq!(json["tokensRemaining"], -500);
        assert_eq!(json["percentUsed"], 105.0);
        assert!(json.get("estimatedCost").is_some());
    }
}
