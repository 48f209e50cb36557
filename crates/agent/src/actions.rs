//! Preset business actions.
//!
//! Each preset turns a loose JSON parameter object into a fully-specified
//! [`BusinessQuery`]. Names outside the catalog become a generic
//! operations query built from the `task` parameter.

use std::fmt;
use std::str::FromStr;

use bizpilot_core::{BusinessQuery, Domain, OutputFormat, PageContext, QueryError, Regime, Urgency};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Action '{action}' requires the '{field}' field")]
    MissingField { action: &'static str, field: &'static str },

    #[error("Invalid '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error(transparent)]
    Query(#[from] QueryError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresetAction {
    AnalyzeCustomer,
    GenerateReport,
    OptimizeStrategy,
    MigrateData,
    MarketInsights,
    QuickDecision,
}

/// Catalog entry, as served by the actions endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionInfo {
    pub action: PresetAction,
    pub description: &'static str,
    pub required_fields: &'static [&'static str],
    pub optional_fields: &'static [&'static str],
    /// Regime the default query classifies into.
    pub regime: Regime,
    pub domain: Domain,
    pub output_format: OutputFormat,
}

impl PresetAction {
    pub const ALL: [PresetAction; 6] = [
        PresetAction::AnalyzeCustomer,
        PresetAction::GenerateReport,
        PresetAction::OptimizeStrategy,
        PresetAction::MigrateData,
        PresetAction::MarketInsights,
        PresetAction::QuickDecision,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnalyzeCustomer => "analyze-customer",
            Self::GenerateReport => "generate-report",
            Self::OptimizeStrategy => "optimize-strategy",
            Self::MigrateData => "migrate-data",
            Self::MarketInsights => "market-insights",
            Self::QuickDecision => "quick-decision",
        }
    }

    pub fn info(&self) -> ActionInfo {
        let (description, required_fields, optional_fields, regime): (
            &'static str,
            &'static [&'static str],
            &'static [&'static str],
            Regime,
        ) = match self {
            Self::AnalyzeCustomer => (
                "Analyze customer data and provide insights",
                &[],
                &["customerId", "question", "context"],
                Regime::Exploration,
            ),
            Self::GenerateReport => (
                "Generate business reports",
                &[],
                &["reportType", "specification", "urgency"],
                Regime::Support,
            ),
            Self::OptimizeStrategy => (
                "Optimize business strategies",
                &[],
                &["area", "goal", "context"],
                Regime::Balanced,
            ),
            Self::MigrateData => (
                "Plan data migration strategies",
                &[],
                &["source", "target", "requirements"],
                Regime::Support,
            ),
            Self::MarketInsights => (
                "Discover market opportunities",
                &[],
                &["segment", "focus", "context"],
                Regime::Exploration,
            ),
            // High urgency routes this to support.
            Self::QuickDecision => (
                "Get quick decision support",
                &["decision"],
                &["options"],
                Regime::Support,
            ),
        };

        let (domain, output_format) = self.target();
        ActionInfo {
            action: *self,
            description,
            required_fields,
            optional_fields,
            regime,
            domain,
            output_format,
        }
    }

    fn target(&self) -> (Domain, OutputFormat) {
        match self {
            Self::AnalyzeCustomer => (Domain::Analytics, OutputFormat::Markdown),
            Self::GenerateReport => (Domain::Operations, OutputFormat::Markdown),
            Self::OptimizeStrategy => (Domain::Strategy, OutputFormat::ActionItems),
            Self::MigrateData => (Domain::Operations, OutputFormat::ActionItems),
            Self::MarketInsights => (Domain::Analytics, OutputFormat::Json),
            Self::QuickDecision => (Domain::Strategy, OutputFormat::Text),
        }
    }

    fn build(&self, params: &Map<String, Value>) -> Result<BusinessQuery, ActionError> {
        let p = |key: &str, default: &str| param(params, key).unwrap_or_else(|| default.to_string());
        let (domain, format) = self.target();

        let (task, urgency, forward_context) = match self {
            Self::AnalyzeCustomer => (
                format!(
                    "Analyze customer {}: {}",
                    p("customerId", "portfolio"),
                    p("question", "provide insights")
                ),
                None,
                true,
            ),
            Self::GenerateReport => (
                format!(
                    "Generate {} report: {}",
                    p("reportType", "business"),
                    p("specification", "comprehensive overview")
                ),
                Some(parse_or(params, "urgency", Urgency::Medium)?),
                false,
            ),
            Self::OptimizeStrategy => (
                format!(
                    "Optimize {} strategy: {}",
                    p("area", "business"),
                    p("goal", "maximize efficiency")
                ),
                None,
                true,
            ),
            Self::MigrateData => (
                format!(
                    "Plan data migration from {} to {}: {}",
                    p("source", "Excel"),
                    p("target", "system"),
                    p("requirements", "maintain integrity")
                ),
                Some(Urgency::High),
                false,
            ),
            Self::MarketInsights => (
                format!(
                    "Discover market insights for {}: {}",
                    p("segment", "target market"),
                    p("focus", "opportunities and threats")
                ),
                None,
                true,
            ),
            Self::QuickDecision => {
                let decision = param(params, "decision").ok_or(ActionError::MissingField {
                    action: self.as_str(),
                    field: "decision",
                })?;
                (
                    format!(
                        "Help decide: {decision}. Options: {}",
                        p("options", "provide recommendation")
                    ),
                    Some(Urgency::High),
                    false,
                )
            }
        };

        let mut query = BusinessQuery::new(task).with_domain(domain).with_format(format);
        query.urgency = urgency;
        if forward_context {
            query.context = params.get("context").filter(|v| !v.is_null()).cloned();
        }
        Ok(query)
    }
}

impl fmt::Display for PresetAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetAction {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| QueryError::UnknownValue {
                field: "action",
                value: s.to_string(),
            })
    }
}

pub fn catalog() -> Vec<ActionInfo> {
    PresetAction::ALL.iter().map(PresetAction::info).collect()
}

/// Non-empty string or number parameter, as text.
fn param(params: &Map<String, Value>, key: &str) -> Option<String> {
    match params.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_or<T>(params: &Map<String, Value>, key: &'static str, default: T) -> Result<T, ActionError>
where
    T: FromStr<Err = QueryError>,
{
    match param(params, key) {
        Some(raw) => Ok(raw.parse()?),
        None => Ok(default),
    }
}

/// Build the query for `action` from its JSON parameters.
///
/// Every action also honours `deepContextMode` and `currentPageContext`.
pub fn build_query(action: &str, params: &Value) -> Result<BusinessQuery, ActionError> {
    let empty = Map::new();
    let params = match params {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => {
            return Err(ActionError::InvalidField {
                field: "body",
                reason: "expected a JSON object".into(),
            });
        }
    };

    let mut query = match action.parse::<PresetAction>() {
        Ok(preset) => preset.build(params)?,
        Err(_) => generic_query(action, params)?,
    };

    if let Some(deep) = params.get("deepContextMode").and_then(Value::as_bool) {
        query.deep_context = deep;
    }
    if let Some(page) = params.get("currentPageContext").filter(|v| !v.is_null()) {
        let page: PageContext =
            serde_json::from_value(page.clone()).map_err(|e| ActionError::InvalidField {
                field: "currentPageContext",
                reason: e.to_string(),
            })?;
        query.page_context = Some(page);
    }

    query.validate()?;
    Ok(query)
}

fn generic_query(action: &str, params: &Map<String, Value>) -> Result<BusinessQuery, ActionError> {
    let task = param(params, "task").unwrap_or_else(|| format!("Process {action} request"));
    let mut query = BusinessQuery::new(task)
        .with_domain(parse_or(params, "domain", Domain::Operations)?)
        .with_format(parse_or(params, "outputFormat", OutputFormat::Text)?)
        .with_urgency(parse_or(params, "urgency", Urgency::Medium)?);
    query.context = params.get("context").filter(|v| !v.is_null()).cloned();
    Ok(query)
}
