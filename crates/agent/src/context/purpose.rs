//! Shared-purpose framing, the first fragment of every prompt.

use bizpilot_core::Domain;

pub const ENVIRONMENT: &str = "the bizpilot business intelligence platform";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurposeCategory {
    Analysis,
    Strategy,
    ProblemSolving,
    Creation,
    DomainSpecific,
    General,
}

impl PurposeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analysis => "analysis",
            Self::Strategy => "strategy",
            Self::ProblemSolving => "problem-solving",
            Self::Creation => "creation",
            Self::DomainSpecific => "domain-specific",
            Self::General => "general",
        }
    }
}

pub struct PurposeRule {
    pub category: PurposeCategory,
    pub keywords: &'static [&'static str],
    pub framing: &'static str,
}

/// Keyword rules, checked in order. Domain and default framing follow.
pub const PURPOSE_RULES: &[PurposeRule] = &[
    PurposeRule {
        category: PurposeCategory::Analysis,
        keywords: &["analyze", "report"],
        framing: "Creating insights from data together",
    },
    PurposeRule {
        category: PurposeCategory::Strategy,
        keywords: &["strategy", "plan"],
        framing: "Developing strategic direction collaboratively",
    },
    PurposeRule {
        category: PurposeCategory::ProblemSolving,
        keywords: &["problem", "issue"],
        framing: "Solving challenges and finding opportunities",
    },
    PurposeRule {
        category: PurposeCategory::Creation,
        keywords: &["create", "design"],
        framing: "Building something valuable together",
    },
];

const DEFAULT_FRAMING: &str = "Collaborating to achieve meaningful business outcomes";

/// Category and framing line for a task.
pub fn detect(task: &str, domain: Option<Domain>) -> (PurposeCategory, String) {
    let task_lower = task.to_lowercase();
    if let Some(rule) = PURPOSE_RULES
        .iter()
        .find(|r| r.keywords.iter().any(|k| task_lower.contains(k)))
    {
        return (rule.category, rule.framing.to_string());
    }
    match domain {
        Some(d) => (
            PurposeCategory::DomainSpecific,
            format!("Working on {d} optimization together"),
        ),
        None => (PurposeCategory::General, DEFAULT_FRAMING.to_string()),
    }
}

pub fn render(task: &str, domain: Option<Domain>) -> String {
    let (category, framing) = detect(task, domain);
    format!(
        "## Shared Purpose\n\
         {framing}.\n\
         Environment: {ENVIRONMENT}\n\
         Purpose category: {}",
        category.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_rules_in_order() {
        assert_eq!(
            detect("Analyze the plan", None).0,
            PurposeCategory::Analysis
        );
        assert_eq!(
            detect("Plan the launch", None).0,
            PurposeCategory::Strategy
        );
        assert_eq!(
            detect("We have an ISSUE with invoices", None).0,
            PurposeCategory::ProblemSolving
        );
        assert_eq!(
            detect("Design a discount scheme", None).0,
            PurposeCategory::Creation
        );
    }

    #[test]
    fn domain_then_default() {
        let (cat, line) = detect("hello", Some(Domain::Finance));
        assert_eq!(cat, PurposeCategory::DomainSpecific);
        assert_eq!(line, "Working on finance optimization together");

        let (cat, line) = detect("hello", None);
        assert_eq!(cat, PurposeCategory::General);
        assert_eq!(line, DEFAULT_FRAMING);
    }

    #[test]
    fn render_names_environment() {
        let out = render("hello", None);
        assert!(out.starts_with("## Shared Purpose"));
        assert!(out.contains(ENVIRONMENT));
    }
}
