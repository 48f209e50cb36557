//! Regime classification.
//!
//! An ordered rule table; the first matching rule decides the regime and
//! anything unmatched is `Balanced`. Keyword matching is a case-insensitive
//! substring test on the task text.

use bizpilot_core::{Domain, Regime, Urgency};

/// One row of the classification table.
#[derive(Debug)]
pub struct RegimeRule {
    pub regime: Regime,
    /// Matches when the query carries this urgency.
    pub urgency: Option<Urgency>,
    /// Matches when the query targets this domain.
    pub domain: Option<Domain>,
    /// Matches when the task contains any of these (lowercase) phrases.
    pub keywords: &'static [&'static str],
}

impl RegimeRule {
    fn matches(&self, task_lower: &str, domain: Option<Domain>, urgency: Option<Urgency>) -> bool {
        (self.urgency.is_some() && self.urgency == urgency)
            || (self.domain.is_some() && self.domain == domain)
            || self.keywords.iter().any(|k| task_lower.contains(k))
    }
}

pub const REGIME_RULES: &[RegimeRule] = &[
    RegimeRule {
        regime: Regime::Support,
        urgency: Some(Urgency::High),
        domain: Some(Domain::Operations),
        keywords: &["migrate", "convert", "generate report", "update", "urgent", "asap"],
    },
    RegimeRule {
        regime: Regime::Exploration,
        urgency: None,
        domain: Some(Domain::Analytics),
        keywords: &["analyze", "discover", "identify patterns", "market", "innovative"],
    },
    RegimeRule {
        regime: Regime::Balanced,
        urgency: None,
        domain: Some(Domain::Strategy),
        keywords: &["plan", "strategy", "optimize", "decision"],
    },
];

/// Pick the processing regime for a query.
pub fn classify(task: &str, domain: Option<Domain>, urgency: Option<Urgency>) -> Regime {
    let task_lower = task.to_lowercase();
    REGIME_RULES
        .iter()
        .find(|rule| rule.matches(&task_lower, domain, urgency))
        .map(|rule| rule.regime)
        .unwrap_or(Regime::Balanced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_urgency_is_support() {
        assert_eq!(
            classify("What should we do?", None, Some(Urgency::High)),
            Regime::Support
        );
    }

    #[test]
    fn operations_domain_is_support() {
        assert_eq!(
            classify("anything at all", Some(Domain::Operations), None),
            Regime::Support
        );
    }

    #[test]
    fn support_keywords_beat_other_regimes() {
        // Each task also carries exploration or balanced vocabulary.
        for task in [
            "URGENT: analyze the market and plan a strategy",
            "Need this asap: discover innovative patterns",
            "Migrate the data and optimize the plan",
            "Generate report on market analysis",
            "Please update the strategy decision",
        ] {
            assert_eq!(classify(task, None, None), Regime::Support, "task: {task}");
        }
        assert_eq!(
            classify("asap please", Some(Domain::Analytics), None),
            Regime::Support
        );
        assert_eq!(
            classify("convert it", Some(Domain::Strategy), Some(Urgency::Low)),
            Regime::Support
        );
    }

    #[test]
    fn exploration_keywords_and_domain() {
        assert_eq!(classify("Analyze churn", None, None), Regime::Exploration);
        assert_eq!(
            classify("Identify patterns in returns", None, None),
            Regime::Exploration
        );
        assert_eq!(
            classify("what happened last week", Some(Domain::Analytics), None),
            Regime::Exploration
        );
        // Exploration outranks balanced keywords.
        assert_eq!(
            classify("Discover a strategy", None, None),
            Regime::Exploration
        );
    }

    #[test]
    fn balanced_rules_and_default() {
        assert_eq!(classify("Plan Q3 hiring", None, None), Regime::Balanced);
        assert_eq!(
            classify("hello", Some(Domain::Strategy), None),
            Regime::Balanced
        );
        assert_eq!(classify("hello", None, None), Regime::Balanced);
        assert_eq!(
            classify("hello", Some(Domain::Sales), Some(Urgency::Low)),
            Regime::Balanced
        );
    }

    #[test]
    fn medium_urgency_does_not_force_support() {
        assert_eq!(
            classify("Analyze margins", None, Some(Urgency::Medium)),
            Regime::Exploration
        );
    }
}
