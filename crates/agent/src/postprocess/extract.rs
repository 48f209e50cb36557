//! Action item and metric extraction.

use std::collections::BTreeMap;

use regex_lite::Regex;

pub trait InsightExtractor: Send + Sync {
    /// Bullet lines (`-` or `•`), marker stripped, empty lines dropped.
    fn extract_action_items(&self, text: &str) -> Vec<String>;

    /// `number label` pairs; a later label overwrites an earlier one.
    fn extract_metrics(&self, text: &str) -> BTreeMap<String, String>;
}

const BULLET_PATTERN: &str = r"(?m)^[•\-][ \t]*(.*)$";
const METRIC_PATTERN: &str = r"(\d+(?:\.\d+)?%?)\s+(\w+)";

/// Regex-based extractor. A pattern that fails to compile extracts nothing.
pub struct PatternExtractor {
    bullet: Option<Regex>,
    metric: Option<Regex>,
}

impl PatternExtractor {
    pub fn new() -> Self {
        Self {
            bullet: Regex::new(BULLET_PATTERN).ok(),
            metric: Regex::new(METRIC_PATTERN).ok(),
        }
    }
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightExtractor for PatternExtractor {
    fn extract_action_items(&self, text: &str) -> Vec<String> {
        let Some(bullet) = &self.bullet else {
            return Vec::new();
        };
        bullet
            .captures_iter(text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }

    fn extract_metrics(&self, text: &str) -> BTreeMap<String, String> {
        let mut metrics = BTreeMap::new();
        let Some(metric) = &self.metric else {
            return metrics;
        };
        for c in metric.captures_iter(text) {
            if let (Some(value), Some(label)) = (c.get(1), c.get(2)) {
                metrics.insert(label.as_str().to_string(), value.as_str().to_string());
            }
        }
        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_compile() {
        let e = PatternExtractor::new();
        assert!(e.bullet.is_some());
        assert!(e.metric.is_some());
    }

    #[test]
    fn two_bullets_two_items() {
        let text = "Summary first.\n- Call the supplier\n- Review invoices\nClosing line.";
        let items = PatternExtractor::new().extract_action_items(text);
        assert_eq!(items, vec!["Call the supplier", "Review invoices"]);
    }

    #[test]
    fn bullet_variants_and_empties() {
        let text = "• Renew contract\n-    \n-\n  - indented is ignored\n-Tight";
        let items = PatternExtractor::new().extract_action_items(text);
        assert_eq!(items, vec!["Renew contract", "Tight"]);
    }

    #[test]
    fn crlf_lines_are_trimmed() {
        let items = PatternExtractor::new().extract_action_items("- One\r\n- Two\r\n");
        assert_eq!(items, vec!["One", "Two"]);
    }

    #[test]
    fn no_bullets_no_items() {
        assert!(PatternExtractor::new().extract_action_items("Plain prose.").is_empty());
    }

    #[test]
    fn metrics_by_label() {
        let text = "Revenue grew 12% year over year across 40 customers and 3.5 days faster.";
        let m = PatternExtractor::new().extract_metrics(text);
        assert_eq!(m.get("year").map(String::as_str), Some("12%"));
        assert_eq!(m.get("customers").map(String::as_str), Some("40"));
        assert_eq!(m.get("days").map(String::as_str), Some("3.5"));
    }

    #[test]
    fn later_metric_overwrites() {
        let m = PatternExtractor::new().extract_metrics("5 orders today, 9 orders tomorrow");
        assert_eq!(m.get("orders").map(String::as_str), Some("9"));
        assert_eq!(m.len(), 1);
    }
}
