//! Tiered business-intelligence modules for deep-context prompts.
//!
//! A task is scored for complexity (0-100), matched to a business domain,
//! and given a tier. The fragment lists up to three modules for that
//! domain and tier, below a fixed platform-capabilities block.

use bizpilot_core::Domain;
use regex_lite::Regex;

use crate::context::purpose::ENVIRONMENT;

// ── Tiers ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Strategic,
    Tactical,
    Operational,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strategic => "strategic",
            Self::Tactical => "tactical",
            Self::Operational => "operational",
        }
    }
}

pub const STRATEGIC_THRESHOLD: u8 = 70;
pub const TACTICAL_THRESHOLD: u8 = 40;

pub fn tier_for(complexity: u8) -> Tier {
    if complexity >= STRATEGIC_THRESHOLD {
        Tier::Strategic
    } else if complexity >= TACTICAL_THRESHOLD {
        Tier::Tactical
    } else {
        Tier::Operational
    }
}

/// One module per started 30 points, at most the three each tier has.
pub fn module_count(complexity: u8) -> usize {
    usize::from(complexity).div_ceil(30).min(3)
}

// ── Complexity ────────────────────────────────────────────────────────────

const BUSINESS_TERMS: &str = r"(?i)strategy|analysis|forecast|optimize|revenue|profit|market|competitive|performance|metrics|bizpilot|platform|features|capabilities|tell.*me.*about|what.*is|crm|erp";
const TECHNICAL_TERMS: &str = r"(?i)roi|kpi|p&l|ltv|cac|ebitda|variance|correlation|regression";
const DOCUMENT_WORDS: &[&str] = &["report", "dashboard", "presentation"];

/// Complexity score of a task, 0-100.
///
/// - 2 per word, at most 30
/// - 10 per business term, plus 30 when the platform is named
/// - 15 per question mark
/// - 12 per technical term
/// - 25 when a document is requested
pub fn complexity(task: &str) -> u8 {
    let lower = task.to_lowercase();
    let words = task.split_whitespace().count();

    let mut score = (words * 2).min(30);
    score += count_matches(BUSINESS_TERMS, task) * 10;
    if lower.contains("bizpilot") {
        score += 30;
    }
    score += task.matches('?').count() * 15;
    score += count_matches(TECHNICAL_TERMS, task) * 12;
    if DOCUMENT_WORDS.iter().any(|w| lower.contains(w)) {
        score += 25;
    }

    score.min(100) as u8
}

fn count_matches(pattern: &str, text: &str) -> usize {
    Regex::new(pattern)
        .map(|re| re.find_iter(text).count())
        .unwrap_or(0)
}

// ── Domain detection ──────────────────────────────────────────────────────

pub struct DomainRule {
    pub domain: Domain,
    pub keywords: &'static [&'static str],
}

/// Checked in order; the first rule with a matching keyword wins.
pub const DOMAIN_RULES: &[DomainRule] = &[
    DomainRule {
        domain: Domain::Sales,
        keywords: &["sales", "revenue", "pipeline", "deal", "quota", "territory"],
    },
    DomainRule {
        domain: Domain::Marketing,
        keywords: &["marketing", "campaign", "brand", "customer", "audience", "content"],
    },
    DomainRule {
        domain: Domain::Finance,
        keywords: &["finance", "budget", "cost", "profit", "cash", "investment"],
    },
    DomainRule {
        domain: Domain::Operations,
        keywords: &["operations", "process", "efficiency", "production", "supply"],
    },
    // Questions about the platform itself count as general operations.
    DomainRule {
        domain: Domain::Operations,
        keywords: &["bizpilot", "platform", "features", "capabilities", "crm", "erp"],
    },
];

pub fn detect_domain(task: &str) -> Option<Domain> {
    let lower = task.to_lowercase();
    DOMAIN_RULES
        .iter()
        .find(|r| r.keywords.iter().any(|k| lower.contains(k)))
        .map(|r| r.domain)
}

// ── Module tables ─────────────────────────────────────────────────────────

struct ModuleSet {
    domain: Domain,
    strategic: [&'static str; 3],
    tactical: [&'static str; 3],
    operational: [&'static str; 3],
}

impl ModuleSet {
    fn for_tier(&self, tier: Tier) -> &[&'static str; 3] {
        match tier {
            Tier::Strategic => &self.strategic,
            Tier::Tactical => &self.tactical,
            Tier::Operational => &self.operational,
        }
    }
}

const MODULES: &[ModuleSet] = &[
    ModuleSet {
        domain: Domain::Sales,
        strategic: [
            "Market Opportunity Analysis: sizing, growth trends, segments",
            "Competitive Sales Intelligence: strategies, market share",
            "Sales Strategic Forecasting: projections, expansion planning",
        ],
        tactical: [
            "Sales Performance Analysis: pipeline, conversion, team metrics",
            "Sales Resource Optimization: territory, quotas, allocation",
            "Sales Implementation Planning: campaigns, process optimization",
        ],
        operational: [
            "Real-time Sales Monitoring: live pipeline, daily metrics",
            "Sales Operational Metrics: activities, scorecards",
            "Sales Issue Resolution: deal rescue, improvement plans",
        ],
    },
    ModuleSet {
        domain: Domain::Marketing,
        strategic: [
            "Brand Analysis: positioning, perception, landscape",
            "Customer Intelligence: segmentation, lifetime value, behavior",
            "Marketing Strategic Forecasting: channel effectiveness, budget",
        ],
        tactical: [
            "Campaign Performance: ROI, attribution, effectiveness",
            "Marketing Resource Optimization: budget, channel mix, targeting",
            "Marketing Implementation: planning, content strategy, roadmaps",
        ],
        operational: [
            "Real-time Marketing Monitoring: campaigns, engagement",
            "Marketing Operational Metrics: daily KPIs, lead generation",
            "Marketing Issue Resolution: optimization, troubleshooting",
        ],
    },
    ModuleSet {
        domain: Domain::Finance,
        strategic: [
            "Financial Market Trends: benchmarking, economic indicators",
            "Competitive Financial Analysis: performance, positioning",
            "Financial Strategic Forecasting: projections, investment scenarios",
        ],
        tactical: [
            "Financial Performance Analysis: P&L, variance, KPIs",
            "Resource Financial Optimization: budget, cost reduction",
            "Financial Implementation Planning: cash flow, prioritization",
        ],
        operational: [
            "Real-time Financial Monitoring: dashboards, cash position",
            "Financial Operational Metrics: daily and weekly KPIs, expenses",
            "Financial Issue Resolution: variance response, cash management",
        ],
    },
    ModuleSet {
        domain: Domain::Operations,
        strategic: [
            "Operational Excellence Strategy: efficiency, innovation",
            "Supply Chain Intelligence: optimization, risk management",
            "Operations Strategic Planning: capacity, technology roadmap",
        ],
        tactical: [
            "Process Performance Analysis: efficiency, bottlenecks",
            "Resource Operations Optimization: capacity, scheduling",
            "Operations Implementation: process improvement, automation",
        ],
        operational: [
            "Real-time Operations Monitoring: production, quality",
            "Operations Metrics: productivity, utilization",
            "Operations Issue Resolution: troubleshooting, maintenance",
        ],
    },
];

/// The first `count` modules for a domain and tier. Empty for domains
/// without a module table.
pub fn modules(domain: Domain, tier: Tier, count: usize) -> Vec<&'static str> {
    MODULES
        .iter()
        .find(|m| m.domain == domain)
        .map(|m| m.for_tier(tier).iter().take(count).copied().collect())
        .unwrap_or_default()
}

// ── Rendering ─────────────────────────────────────────────────────────────

pub const PLATFORM_CAPABILITIES: &str = "\
### Platform Capabilities
- **Customer Management**: A/B/C/D grading, payment analytics, risk scoring
- **Order Processing**: full order lifecycle with commission and status tracking
- **Quotation System**: proposal management and conversion tracking
- **RFQ Management**: request processing and proposal workflow
- **Business Intelligence**: real-time analytics and predictive insights
- **Data Access**: read-only access to business data, never modified";

fn depth_label(count: usize) -> &'static str {
    match count {
        1 => "Summary",
        2 => "Standard",
        _ => "Comprehensive",
    }
}

/// The intelligence fragment, or `None` when no business domain is detected.
pub fn render(task: &str) -> Option<String> {
    let domain = detect_domain(task)?;
    let score = complexity(task);
    let tier = tier_for(score);
    let selected = modules(domain, tier, module_count(score));
    if selected.is_empty() {
        return None;
    }

    let mut out = format!(
        "## Business Intelligence ({ENVIRONMENT})\n\
         Complexity: {score}/100\n\n\
         {PLATFORM_CAPABILITIES}\n\n\
         ### {} - {} Intelligence Modules",
        domain.as_str().to_uppercase(),
        tier.as_str().to_uppercase()
    );
    let depth = depth_label(selected.len());
    for (i, module) in selected.iter().enumerate() {
        out.push_str(&format!(
            "\n\nModule {}: {module}\n- Depth: {depth}\n- Focus: actionable intelligence",
            i + 1
        ));
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_thresholds() {
        assert_eq!(tier_for(0), Tier::Operational);
        assert_eq!(tier_for(39), Tier::Operational);
        assert_eq!(tier_for(40), Tier::Tactical);
        assert_eq!(tier_for(69), Tier::Tactical);
        assert_eq!(tier_for(70), Tier::Strategic);
        assert_eq!(tier_for(100), Tier::Strategic);
    }

    #[test]
    fn module_count_rounds_up_per_thirty() {
        assert_eq!(module_count(0), 0);
        assert_eq!(module_count(1), 1);
        assert_eq!(module_count(30), 1);
        assert_eq!(module_count(31), 2);
        assert_eq!(module_count(60), 2);
        assert_eq!(module_count(61), 3);
        assert_eq!(module_count(100), 3);
    }

    #[test]
    fn complexity_scoring() {
        // 3 words.
        assert_eq!(complexity("check the stock"), 6);
        // 4 words, one question.
        assert_eq!(complexity("where is my order?"), 8 + 15);
        // 3 words, one business term, one technical term.
        assert_eq!(complexity("revenue ROI now"), 6 + 10 + 12);
        // 2 words, document request.
        assert_eq!(complexity("weekly dashboard"), 4 + 25);
        // Many words hit the word cap, terms push it to 100.
        let long = "revenue profit market forecast strategy ".repeat(10);
        assert_eq!(complexity(&long), 100);
    }

    #[test]
    fn domain_rules_in_order() {
        assert_eq!(detect_domain("Grow the sales pipeline"), Some(Domain::Sales));
        assert_eq!(detect_domain("Plan a brand campaign"), Some(Domain::Marketing));
        assert_eq!(detect_domain("Trim the budget"), Some(Domain::Finance));
        assert_eq!(detect_domain("Fix the supply process"), Some(Domain::Operations));
        // Revenue wins over budget: sales is checked first.
        assert_eq!(detect_domain("revenue vs budget"), Some(Domain::Sales));
        assert_eq!(detect_domain("What does bizpilot do"), Some(Domain::Operations));
        assert_eq!(detect_domain("hello there"), None);
    }

    #[test]
    fn no_fragment_without_domain() {
        assert!(render("hello there").is_none());
        assert!(render("What is the weather?").is_none());
    }

    #[test]
    fn low_complexity_gets_one_operational_module() {
        // 3 words, "cost" matches no business term.
        let out = render("cut shipping cost").unwrap();
        assert!(out.contains("Complexity: 6/100"));
        assert!(out.contains("### FINANCE - OPERATIONAL Intelligence Modules"));
        assert!(out.contains("Module 1: Real-time Financial Monitoring"));
        assert!(!out.contains("Module 2:"));
        assert!(out.contains("- Depth: Summary"));
        assert!(out.contains("### Platform Capabilities"));
    }

    #[test]
    fn high_complexity_gets_three_strategic_modules() {
        let task = "Write a report on revenue forecast and market strategy with ROI and KPI?";
        let score = complexity(task);
        assert!(score >= STRATEGIC_THRESHOLD, "score {score}");

        let out = render(task).unwrap();
        assert!(out.contains("### SALES - STRATEGIC Intelligence Modules"));
        assert!(out.contains("Module 3: Sales Strategic Forecasting"));
        assert!(out.contains("- Depth: Comprehensive"));
    }

    #[test]
    fn tactical_band_gets_two_modules() {
        // 5 words (10) + revenue (10) + question (15) + report (25) = 60.
        let task = "Is the revenue report ready?";
        assert_eq!(complexity(task), 60);
        let out = render(task).unwrap();
        assert!(out.contains("### SALES - TACTICAL Intelligence Modules"));
        assert!(out.contains("Module 2: Sales Resource Optimization"));
        assert!(!out.contains("Module 3:"));
        assert!(out.contains("- Depth: Standard"));
    }

    #[test]
    fn domains_without_tables_have_no_modules() {
        assert!(modules(Domain::Analytics, Tier::Strategic, 3).is_empty());
        assert_eq!(modules(Domain::Sales, Tier::Tactical, 2).len(), 2);
    }
}
