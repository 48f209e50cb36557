//! Confidence from regime-characteristic vocabulary.

use bizpilot_core::Regime;

const BASE: f64 = 0.6;
const PER_WORD: f64 = 0.1;
const CAP: f64 = 0.95;

pub fn characteristic_words(regime: Regime) -> &'static [&'static str] {
    match regime {
        Regime::Support => &["implement", "execute", "complete", "efficient"],
        Regime::Exploration => &["discover", "pattern", "insight", "opportunity"],
        Regime::Balanced => &["optimize", "integrate", "strategy", "coordinate"],
    }
}

/// 0.6 plus 0.1 per distinct characteristic word present, capped at 0.95.
pub fn score(text: &str, regime: Regime) -> f64 {
    let lower = text.to_lowercase();
    let hits = characteristic_words(regime)
        .iter()
        .filter(|w| lower.contains(*w))
        .count();
    (BASE + PER_WORD * hits as f64).min(CAP)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn no_matches_is_base() {
        assert!(close(score("Nothing relevant here", Regime::Support), 0.6));
    }

    #[test]
    fn repeated_word_counts_once() {
        assert!(close(
            score("Execute, execute, EXECUTE", Regime::Support),
            0.7
        ));
    }

    #[test]
    fn capped() {
        let text = "Discover the pattern, gain insight, seize the opportunity";
        assert!(close(score(text, Regime::Exploration), 0.95));
    }

    #[test]
    fn words_are_regime_specific() {
        let text = "Optimize and coordinate the strategy";
        assert!(close(score(text, Regime::Balanced), 0.9));
        assert!(close(score(text, Regime::Support), 0.6));
    }
}
