//! Token pricing.
//!
//! The query pipeline bills input and output tokens at one flat rate,
//! expressed in USD per 1 million tokens.

use serde::{Deserialize, Serialize};

/// USD per 1M tokens for claude-3-5-haiku input, used as the flat rate.
pub const HAIKU_USD_PER_MILLION: f64 = 0.80;

/// Flat per-token pricing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenRate {
    /// Price per 1M tokens in USD.
    pub usd_per_million: f64,
}

impl TokenRate {
    pub fn new(usd_per_million: f64) -> Self {
        Self { usd_per_million }
    }

    /// Compute cost for the given total token count.
    pub fn cost(&self, tokens: u64) -> f64 {
        tokens as f64 * self.usd_per_million / 1_000_000.0
    }

    /// Worst-case cost of a per-request output ceiling.
    pub fn cost_of_estimate(&self, tokens: u32) -> f64 {
        self.cost(u64::from(tokens))
    }
}

impl Default for TokenRate {
    fn default() -> Self {
        Self::new(HAIKU_USD_PER_MILLION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rate_matches_per_thousand_formula() {
        let rate = TokenRate::default();
        // 1,500 tokens at $0.0008 per 1K
        let expected = 1_500.0 / 1_000.0 * 0.0008;
        assert!((rate.cost(1_500) - expected).abs() < 1e-12);
    }

    #[test]
    fn zero_tokens_cost_nothing() {
        assert_eq!(TokenRate::new(3.0).cost(0), 0.0);
    }

    #[test]
    fn custom_rate() {
        let rate = TokenRate::new(3.0);
        assert!((rate.cost(1_000_000) - 3.0).abs() < 1e-10);
        assert!((rate.cost_of_estimate(2_000) - 0.006).abs() < 1e-10);
    }
}
