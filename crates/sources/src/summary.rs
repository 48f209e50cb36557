//! Aggregation of raw records into a `BusinessSnapshot`.

use std::collections::BTreeMap;

use bizpilot_core::{BusinessSnapshot, CustomerHighlight, KeyMetrics, PageContext};
use chrono::{DateTime, Duration, Utc};

use crate::records::{CustomerRecord, OrderRecord};

const HIGHLIGHT_COUNT: usize = 3;
const UNGRADED: &str = "Ungraded";

fn payment_performance(avg_payment_days: f64) -> &'static str {
    if avg_payment_days > 60.0 {
        "Poor"
    } else if avg_payment_days > 45.0 {
        "Needs Attention"
    } else {
        "Good"
    }
}

/// Build a snapshot from records. `now` anchors the "this week" window.
pub fn summarize(
    customers: &[CustomerRecord],
    orders: &[OrderRecord],
    quotation_count: usize,
    rfq_count: usize,
    page: Option<PageContext>,
    now: DateTime<Utc>,
) -> BusinessSnapshot {
    let total_revenue: f64 = orders.iter().filter_map(|o| o.total_amount).sum();
    let avg_order_value = if orders.is_empty() {
        0.0
    } else {
        total_revenue / orders.len() as f64
    };

    let mut customer_grades: BTreeMap<String, u32> = BTreeMap::new();
    for c in customers {
        let grade = c
            .payment_grade
            .as_deref()
            .filter(|g| !g.is_empty())
            .unwrap_or(UNGRADED);
        *customer_grades.entry(grade.to_string()).or_insert(0) += 1;
    }

    // Averaged over all customers, including those with no payment history.
    let avg_payment_days = if customers.is_empty() {
        0.0
    } else {
        customers
            .iter()
            .filter_map(|c| c.average_payment_days)
            .sum::<f64>()
            / customers.len() as f64
    };

    let week_ago = now - Duration::days(7);
    let mut recent_activity = Vec::new();

    let new_customers = customers
        .iter()
        .filter(|c| c.created().is_some_and(|t| t > week_ago))
        .count();
    if new_customers > 0 {
        recent_activity.push(format!("{new_customers} new customers this week"));
    }

    let new_orders = orders
        .iter()
        .filter(|o| o.created().is_some_and(|t| t > week_ago))
        .count();
    if new_orders > 0 {
        recent_activity.push(format!("{new_orders} new orders this week"));
    }

    let grade_a = customers
        .iter()
        .filter(|c| c.payment_grade.as_deref() == Some("A"))
        .count();
    if grade_a > 0 {
        recent_activity.push(format!(
            "{grade_a} Grade A customers (excellent payment history)"
        ));
    }

    let highlights = customers
        .iter()
        .take(HIGHLIGHT_COUNT)
        .map(|c| CustomerHighlight {
            company_name: c.company_name.clone(),
            grade: c.payment_grade.clone(),
            order_count: c.order_count.unwrap_or(0),
        })
        .collect();

    BusinessSnapshot {
        total_customers: customers.len(),
        total_orders: orders.len(),
        total_quotations: quotation_count,
        total_rfqs: rfq_count,
        recent_activity,
        key_metrics: KeyMetrics {
            total_revenue,
            avg_order_value,
            customer_grades,
            payment_performance: payment_performance(avg_payment_days).to_string(),
        },
        highlights,
        page,
    }
}
