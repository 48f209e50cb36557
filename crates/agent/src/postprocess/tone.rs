//! Tone pass: replace internal jargon with plain business language.

use regex_lite::Regex;

/// Two steps: `rewrite` works word by word and keeps line structure, so
/// extraction can run on its output. `finish` touches the whole response.
pub trait ToneFilter: Send + Sync {
    fn rewrite(&self, text: &str) -> String;

    fn finish(&self, text: String) -> String {
        text
    }

    fn apply(&self, text: &str) -> String {
        self.finish(self.rewrite(text))
    }
}

/// Jargon and its plain replacement. Longer phrases come first.
pub const JARGON: &[(&str, &str)] = &[
    ("cognitive architecture", "analytical framework"),
    ("non-idempotent", "compounding"),
    ("consciousness", "intelligence"),
    ("amplification", "enhancement"),
    ("ordinal", "priority level"),
    ("regime", "mode"),
];

/// Case-insensitive jargon replacement, then sentence-final punctuation.
pub struct PlainBusinessTone {
    rules: Vec<(Regex, &'static str)>,
}

impl PlainBusinessTone {
    pub fn new() -> Self {
        let rules = JARGON
            .iter()
            .filter_map(|(jargon, plain)| {
                Regex::new(&format!("(?i){}", regex_lite::escape(jargon)))
                    .ok()
                    .map(|re| (re, *plain))
            })
            .collect();
        Self { rules }
    }
}

impl Default for PlainBusinessTone {
    fn default() -> Self {
        Self::new()
    }
}

impl ToneFilter for PlainBusinessTone {
    fn rewrite(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (re, plain) in &self.rules {
            out = re.replace_all(&out, *plain).into_owned();
        }
        out
    }

    fn finish(&self, text: String) -> String {
        let mut out = text.trim_end().to_string();
        if !out.is_empty() && !out.ends_with(['.', '!', '?']) {
            out.push('.');
        }
        out
    }
}

/// Leaves text untouched.
pub struct NoTone;

impl ToneFilter for NoTone {
    fn rewrite(&self, text: &str) -> String {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_jargon_case_insensitively() {
        let tone = PlainBusinessTone::new();
        let out = tone.apply("The Consciousness of this REGIME drives amplification.");
        assert_eq!(out, "The intelligence of this mode drives enhancement.");
    }

    #[test]
    fn multi_word_and_hyphenated_terms() {
        let tone = PlainBusinessTone::new();
        let out = tone.apply("Our cognitive architecture is non-idempotent at each ordinal!");
        assert_eq!(
            out,
            "Our analytical framework is compounding at each priority level!"
        );
    }

    #[test]
    fn appends_period_and_trims() {
        let tone = PlainBusinessTone::new();
        assert_eq!(tone.apply("Ship it  \n"), "Ship it.");
        assert_eq!(tone.apply("Ready?"), "Ready?");
        assert_eq!(tone.apply("   "), "");
    }

    #[test]
    fn rewrite_leaves_punctuation_alone() {
        let tone = PlainBusinessTone::new();
        assert_eq!(
            tone.rewrite("- Review the regime\n- Ship it  "),
            "- Review the mode\n- Ship it  "
        );
    }

    #[test]
    fn no_tone_is_identity() {
        assert_eq!(NoTone.apply("regime  "), "regime  ");
    }
}
