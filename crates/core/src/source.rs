//! Collaborator traits for optional prompt context.
//!
//! Both collaborators are best-effort: the agent treats any error they
//! return as "omit this fragment" and never fails a query because of them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::SourceError;
use crate::query::{Attachment, PageContext};

/// Aggregates over the business records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetrics {
    pub total_revenue: f64,
    pub avg_order_value: f64,
    /// Customer count per payment grade ("Ungraded" for none)
    pub customer_grades: BTreeMap<String, u32>,
    pub payment_performance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerHighlight {
    pub company_name: String,
    pub grade: Option<String>,
    pub order_count: u32,
}

/// Read-only summary of customers, orders, quotations and RFQs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSnapshot {
    pub total_customers: usize,
    pub total_orders: usize,
    pub total_quotations: usize,
    pub total_rfqs: usize,
    pub recent_activity: Vec<String>,
    pub key_metrics: KeyMetrics,
    /// First few customers, for page-specific context
    #[serde(default)]
    pub highlights: Vec<CustomerHighlight>,
    #[serde(default)]
    pub page: Option<PageContext>,
}

impl BusinessSnapshot {
    /// Placeholder used when the live source cannot be reached.
    pub fn unavailable(page: Option<PageContext>) -> Self {
        Self {
            recent_activity: vec!["Data temporarily unavailable".to_string()],
            key_metrics: KeyMetrics {
                payment_performance: "Unknown".to_string(),
                ..Default::default()
            },
            page,
            ..Default::default()
        }
    }

    pub fn grade_count(&self, grade: &str) -> u32 {
        self.key_metrics
            .customer_grades
            .get(grade)
            .copied()
            .unwrap_or(0)
    }
}

/// Source of live business data for deep-context prompts.
#[async_trait]
pub trait BusinessDataSource: Send + Sync {
    fn name(&self) -> &str;

    /// Take a snapshot, optionally focused on the page the user is on.
    async fn snapshot(&self, page: Option<&PageContext>) -> Result<BusinessSnapshot, SourceError>;
}

/// Turns attachment descriptors into a short prompt fragment.
#[async_trait]
pub trait AttachmentProcessor: Send + Sync {
    async fn summarize(&self, attachments: &[Attachment]) -> Result<String, SourceError>;
}
