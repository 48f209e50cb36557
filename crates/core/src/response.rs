//! The caller-facing response record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::regime::Regime;

/// One `#`-headed block of a markdown answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownSection {
    /// Heading text without the leading hashes; empty for preamble text
    pub heading: String,
    pub content: String,
}

/// Structured view of the answer, one variant per requested output format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "kebab-case")]
pub enum ResponseBody {
    Text { text: String },
    Json { data: serde_json::Value },
    Markdown { sections: Vec<MarkdownSection> },
    ActionItems { items: Vec<String> },
}

impl ResponseBody {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessResponse {
    pub response: String,
    pub regime: Regime,
    pub confidence: f64,
    pub action_items: Vec<String>,
    pub metrics: BTreeMap<String, String>,
    pub tokens_used: u64,
    /// Estimated cost in USD
    pub cost: f64,
    /// Reported regime multiplier
    pub amplification: f64,
    pub body: ResponseBody,
}
