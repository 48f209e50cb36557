//! Token budget manager.
//!
//! Tracks cumulative token usage against a fixed quota and derives the
//! per-request output ceiling. The quota is informational: recording usage
//! never rejects or throttles anything, and `tokens_remaining` is allowed to
//! go negative.

use std::sync::atomic::{AtomicU64, Ordering};

use bizpilot_core::{OutputFormat, Urgency};
use tracing::debug;

use crate::model::UsageStats;
use crate::pricing::TokenRate;

/// Hard ceiling on any derived output size.
pub const MAX_OUTPUT_TOKENS: u32 = 2_000;

/// Default quota per billing cycle.
pub const DEFAULT_TOKEN_BUDGET: u64 = 10_000;

/// Base output size for a format before urgency scaling.
pub fn base_output_tokens(format: OutputFormat) -> u32 {
    match format {
        OutputFormat::Text => 500,
        OutputFormat::Json => 800,
        OutputFormat::Markdown => 600,
        OutputFormat::ActionItems => 400,
    }
}

fn urgency_scale(urgency: Option<Urgency>) -> f64 {
    match urgency {
        Some(Urgency::High) => 0.7,
        Some(Urgency::Low) => 1.3,
        Some(Urgency::Medium) | None => 1.0,
    }
}

/// Output-token ceiling for a request: base size by format, scaled by
/// urgency, rounded, then capped at `cap`.
pub fn estimate_output_tokens(format: OutputFormat, urgency: Option<Urgency>, cap: u32) -> u32 {
    let scaled = (f64::from(base_output_tokens(format)) * urgency_scale(urgency)).round() as u32;
    scaled.min(cap)
}

/// Process-wide usage counter. One per agent instance.
#[derive(Debug)]
pub struct UsageLedger {
    budget: u64,
    max_output_tokens: u32,
    rate: TokenRate,
    used: AtomicU64,
}

impl UsageLedger {
    pub fn new(budget: u64, rate: TokenRate) -> Self {
        Self {
            budget,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            rate,
            used: AtomicU64::new(0),
        }
    }

    /// Override the output ceiling; values above the hard cap are clamped.
    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = max.min(MAX_OUTPUT_TOKENS);
        self
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }

    pub fn rate(&self) -> TokenRate {
        self.rate
    }

    pub fn estimate_output_tokens(&self, format: OutputFormat, urgency: Option<Urgency>) -> u32 {
        estimate_output_tokens(format, urgency, self.max_output_tokens)
    }

    /// Add to the running total. Returns the new total.
    pub fn record_usage(&self, tokens: u64) -> u64 {
        let total = self.used.fetch_add(tokens, Ordering::Relaxed) + tokens;
        if total > self.budget {
            debug!(used = total, budget = self.budget, "Token budget exceeded (advisory)");
        }
        total
    }

    pub fn tokens_used(&self) -> u64 {
        self.used.load(Ordering::Relaxed)
    }

    pub fn cost(&self, tokens: u64) -> f64 {
        self.rate.cost(tokens)
    }

    pub fn stats(&self) -> UsageStats {
        let used = self.tokens_used();
        let percent_used = if self.budget == 0 {
            0.0
        } else {
            used as f64 / self.budget as f64 * 100.0
        };

        UsageStats {
            tokens_used: used,
            tokens_remaining: self.budget as i64 - used as i64,
            percent_used,
            estimated_cost: self.rate.cost(used),
        }
    }

    /// Zero the counter (start of a new cycle).
    pub fn reset(&self) {
        self.used.store(0, Ordering::Relaxed);
    }
}

impl Default for UsageLedger {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_BUDGET, TokenRate::default())
    }
}
