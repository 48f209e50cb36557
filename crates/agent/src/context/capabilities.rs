//! Capability catalog, filtered per query.

use bizpilot_core::Domain;

const ALWAYS: &[&str] = &[
    "Natural language understanding and generation",
    "Collaborative problem-solving approach",
];

const BY_KEYWORD: &[(&[&str], &[&str])] = &[
    (
        &["analyze", "data"],
        &["Data analysis and pattern recognition", "Statistical insights and trends"],
    ),
    (
        &["report", "document"],
        &["Professional document generation", "Executive summary creation"],
    ),
    (
        &["strategy", "plan"],
        &["Strategic planning and forecasting", "Scenario analysis and modeling"],
    ),
    (
        &["dashboard", "visual"],
        &["Dashboard design and metrics", "Data visualization planning"],
    ),
];

fn by_domain(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::Sales => &["Sales performance analysis", "Pipeline optimization insights"],
        Domain::Marketing => &["Marketing effectiveness analysis", "Campaign performance insights"],
        Domain::Finance => &["Financial analysis and modeling", "Budget and cost optimization"],
        Domain::Operations => &["Process optimization analysis", "Efficiency improvement insights"],
        Domain::Analytics | Domain::Strategy => &[],
    }
}

/// Capabilities relevant to a task, in catalog order, without duplicates.
pub fn select(task: &str, domain: Option<Domain>) -> Vec<&'static str> {
    let task_lower = task.to_lowercase();
    let mut selected: Vec<&'static str> = ALWAYS.to_vec();

    for (triggers, caps) in BY_KEYWORD {
        if triggers.iter().any(|t| task_lower.contains(t)) {
            selected.extend_from_slice(caps);
        }
    }
    if let Some(d) = domain {
        selected.extend_from_slice(by_domain(d));
    }

    let mut seen = std::collections::HashSet::new();
    selected.retain(|c| seen.insert(*c));
    selected
}

pub fn render(task: &str, domain: Option<Domain>) -> String {
    let mut out = String::from("## Available Capabilities\n");
    for cap in select(task, domain) {
        out.push_str("- ");
        out.push_str(cap);
        out.push('\n');
    }
    out.trim_end().to_string()
}
