//! Domain knowledge: regime profile, domain guidance and the company profile.

use bizpilot_core::{Domain, Regime};

pub const COMPANY: &str = "PH Trading";
pub const INDUSTRY: &str = "Trading/Commerce";
pub const GOALS: [&str; 3] = ["Customer optimization", "Revenue growth", "Operational efficiency"];

fn domain_guidance(domain: Domain) -> &'static str {
    match domain {
        Domain::Sales => "Tie recommendations to pipeline health, conversion and order value.",
        Domain::Operations => "Favour concrete procedures, owners and turnaround times.",
        Domain::Analytics => "Ground findings in the available figures and say where data is thin.",
        Domain::Strategy => "Weigh options against the company goals and name the trade-offs.",
        Domain::Marketing => "Focus on segments, campaign reach and customer acquisition cost.",
        Domain::Finance => "Watch cash flow, receivables and payment grades.",
    }
}

/// The cacheable part of the knowledge fragment. Depends only on
/// `(domain, regime)`.
pub fn render(domain: Option<Domain>, regime: Regime) -> String {
    let profile = regime.profile();
    let mut out = format!(
        "## Processing Mode: {regime}\n\
         Focus: {}\n\
         Optimal for: {}\n\
         Enhancement factor: {:.3}",
        profile.focus,
        profile.optimal_for.join(", "),
        profile.amplification,
    );
    if let Some(d) = domain {
        out.push_str(&format!("\n\n## Domain: {d}\n{}", domain_guidance(d)));
    }
    out
}

/// Included when a domain is set or the task is about customers or the business.
pub fn company_profile(task: &str, domain: Option<Domain>) -> Option<String> {
    let task_lower = task.to_lowercase();
    if domain.is_none() && !task_lower.contains("customer") && !task_lower.contains("business") {
        return None;
    }
    Some(format!(
        "## Company Profile\nCompany: {COMPANY} ({INDUSTRY})\nGoals: {}",
        GOALS.join(", ")
    ))
}
