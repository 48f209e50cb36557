//! Deep-context rendering of a live business snapshot.

use bizpilot_core::BusinessSnapshot;

/// `1234567.891` → `1,234,567.89`
fn money(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

pub fn render(snapshot: &BusinessSnapshot) -> String {
    let m = &snapshot.key_metrics;
    let mut out = String::from("## Current Business Data Context (Read-Only Access)\n\n");

    out.push_str("### Business Overview\n");
    out.push_str(&format!(
        "- **{} Customers** ({} Grade A, {} Grade B, {} Grade C)\n",
        snapshot.total_customers,
        snapshot.grade_count("A"),
        snapshot.grade_count("B"),
        snapshot.grade_count("C"),
    ));
    out.push_str(&format!(
        "- **{} Orders** (Total Revenue: ${}, Average Order: ${})\n",
        snapshot.total_orders,
        money(m.total_revenue),
        money(m.avg_order_value),
    ));
    out.push_str(&format!(
        "- **{} Quotations** in pipeline\n",
        snapshot.total_quotations
    ));
    out.push_str(&format!("- **{} RFQs** being processed\n", snapshot.total_rfqs));
    out.push_str(&format!(
        "- **Payment Performance**: {}\n",
        m.payment_performance
    ));

    out.push_str("\n### Recent Activity\n");
    if snapshot.recent_activity.is_empty() {
        out.push_str("- No new activity this week\n");
    }
    for activity in &snapshot.recent_activity {
        out.push_str(&format!("- {activity}\n"));
    }

    let page = snapshot.page.as_ref();
    let location = page
        .and_then(|p| p.user_context.as_deref())
        .unwrap_or("Dashboard");
    out.push_str(&format!(
        "\n### Current Page Context\nThe user is in the **{location}** section.\n"
    ));

    let on_customers = page.and_then(|p| p.section.as_deref()) == Some("customers");
    if on_customers && !snapshot.highlights.is_empty() {
        out.push_str("\n### Customer Highlights\n");
        out.push_str("Grades run from A (excellent) to D (poor).\n");
        for c in &snapshot.highlights {
            out.push_str(&format!(
                "- {}: Grade {}, {} orders\n",
                c.company_name,
                c.grade.as_deref().unwrap_or("Ungraded"),
                c.order_count
            ));
        }
    }

    if let Some(visible) = page
        .map(|p| &p.visible_customers)
        .filter(|v| !v.is_empty())
    {
        out.push_str("\n### Currently Visible Data\n");
        for c in visible {
            out.push_str(&format!("- {}: {}, Grade {}\n", c.name, c.status, c.grade));
        }
    }

    out.push_str(
        "\n### Data Access\n\
         Business data is read-only. Recommend changes; never claim to have made them.",
    );
    out
}
