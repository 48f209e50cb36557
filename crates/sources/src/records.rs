//! Business record shapes as served by the ERP REST API.
//!
//! Only the fields the snapshot summary reads are modelled; everything else
//! in a record is ignored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    #[serde(alias = "name", default)]
    pub company_name: String,

    /// A (excellent) to D (poor)
    #[serde(default)]
    pub payment_grade: Option<String>,

    #[serde(default)]
    pub average_payment_days: Option<f64>,

    #[serde(default)]
    pub order_count: Option<u32>,

    #[serde(default)]
    pub created_at: Option<String>,
}

impl CustomerRecord {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            ..Default::default()
        }
    }

    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.payment_grade = Some(grade.into());
        self
    }

    pub fn with_payment_days(mut self, days: f64) -> Self {
        self.average_payment_days = Some(days);
        self
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(default)]
    pub total_amount: Option<f64>,

    #[serde(default)]
    pub created_at: Option<String>,
}

impl OrderRecord {
    pub fn new(total_amount: f64) -> Self {
        Self {
            total_amount: Some(total_amount),
            created_at: None,
        }
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// RFC 3339 timestamps, or bare `YYYY-MM-DD` dates taken as midnight UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
