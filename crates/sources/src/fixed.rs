//! Fixed-record data source for tests and offline runs.

use async_trait::async_trait;
use bizpilot_core::{BusinessDataSource, BusinessSnapshot, PageContext, SourceError};
use chrono::Utc;

use crate::records::{CustomerRecord, OrderRecord};
use crate::summary::summarize;

/// A data source that summarizes records held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticDataSource {
    customers: Vec<CustomerRecord>,
    orders: Vec<OrderRecord>,
    quotations: usize,
    rfqs: usize,
}

impl StaticDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_customers(mut self, customers: Vec<CustomerRecord>) -> Self {
        self.customers = customers;
        self
    }

    pub fn with_orders(mut self, orders: Vec<OrderRecord>) -> Self {
        self.orders = orders;
        self
    }

    pub fn with_pipeline(mut self, quotations: usize, rfqs: usize) -> Self {
        self.quotations = quotations;
        self.rfqs = rfqs;
        self
    }
}

#[async_trait]
impl BusinessDataSource for StaticDataSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn snapshot(&self, page: Option<&PageContext>) -> Result<BusinessSnapshot, SourceError> {
        Ok(summarize(
            &self.customers,
            &self.orders,
            self.quotations,
            self.rfqs,
            page.cloned(),
            Utc::now(),
        ))
    }
}
