//! The inbound business query and its closed vocabularies.
//!
//! A `BusinessQuery` is built once per request and never mutated after
//! validation. The JSON shape (camelCase) is the caller-facing contract.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// Business area a query belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Sales,
    Operations,
    Analytics,
    Strategy,
    Marketing,
    Finance,
}

impl Domain {
    pub const ALL: [Domain; 6] = [
        Domain::Sales,
        Domain::Operations,
        Domain::Analytics,
        Domain::Strategy,
        Domain::Marketing,
        Domain::Finance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::Operations => "operations",
            Self::Analytics => "analytics",
            Self::Strategy => "strategy",
            Self::Marketing => "marketing",
            Self::Finance => "finance",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QueryError::UnknownValue {
                field: "domain",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(QueryError::UnknownValue {
                field: "urgency",
                value: s.to_string(),
            }),
        }
    }
}

/// Shape the caller wants the answer in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
    ActionItems,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Text,
        OutputFormat::Json,
        OutputFormat::Markdown,
        OutputFormat::ActionItems,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Markdown => "markdown",
            Self::ActionItems => "action-items",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QueryError::UnknownValue {
                field: "output format",
                value: s.to_string(),
            })
    }
}

/// A file the user attached to the query, already reduced to text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,

    /// MIME type as reported by the uploader
    #[serde(rename = "type")]
    pub mime_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_preview: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,

    /// Set when extraction failed upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Attachment {
    pub fn text(name: impl Into<String>, mime_type: impl Into<String>, preview: impl Into<String>) -> Self {
        let preview = preview.into();
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes: Some(preview.len() as u64),
            text_preview: Some(preview),
            error: None,
        }
    }
}

/// Customer row visible on the page the user is looking at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibleCustomer {
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub grade: String,
}

/// Where in the ERP the user asked from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Section key, e.g. "customers", "orders", "rfq"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    /// Human-readable section label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_context: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub visible_customers: Vec<VisibleCustomer>,
}

impl PageContext {
    pub fn section(section: impl Into<String>) -> Self {
        Self {
            section: Some(section.into()),
            ..Default::default()
        }
    }
}

/// The inbound request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessQuery {
    pub task: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,

    #[serde(default)]
    pub output_format: OutputFormat,

    /// Opaque caller payload; carried through but not interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,

    /// Embed a live business-data snapshot in the prompt
    #[serde(default, rename = "deepContextMode")]
    pub deep_context: bool,

    #[serde(default, rename = "currentPageContext", skip_serializing_if = "Option::is_none")]
    pub page_context: Option<PageContext>,
}

impl BusinessQuery {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            domain: None,
            urgency: None,
            output_format: OutputFormat::Text,
            context: None,
            attachments: Vec::new(),
            deep_context: false,
            page_context: None,
        }
    }

    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = Some(urgency);
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn with_deep_context(mut self, page: Option<PageContext>) -> Self {
        self.deep_context = true;
        self.page_context = page;
        self
    }

    /// Reject queries that cannot be answered at all.
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.task.trim().is_empty() {
            return Err(QueryError::EmptyTask);
        }
        Ok(())
    }
}
