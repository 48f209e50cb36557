//! Response post-processing: tone pass, extraction, confidence and the
//! typed body. Pure functions of the model text; nothing here fails.

pub mod body;
pub mod confidence;
pub mod extract;
pub mod tone;

use std::collections::BTreeMap;

use bizpilot_core::{OutputFormat, Regime, ResponseBody};

pub use extract::{InsightExtractor, PatternExtractor};
pub use tone::{NoTone, PlainBusinessTone, ToneFilter};

/// Structured view of one model answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Processed {
    pub text: String,
    pub action_items: Vec<String>,
    pub metrics: BTreeMap<String, String>,
    pub confidence: f64,
    pub body: ResponseBody,
}

pub struct PostProcessor {
    tone: Box<dyn ToneFilter>,
    extractor: Box<dyn InsightExtractor>,
}

impl PostProcessor {
    pub fn new() -> Self {
        Self {
            tone: Box::new(PlainBusinessTone::new()),
            extractor: Box::new(PatternExtractor::new()),
        }
    }

    pub fn with_tone(mut self, tone: impl ToneFilter + 'static) -> Self {
        self.tone = Box::new(tone);
        self
    }

    pub fn with_extractor(mut self, extractor: impl InsightExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn process(&self, raw: &str, regime: Regime, format: OutputFormat) -> Processed {
        // Extract before `finish`, which may punctuate the last bullet.
        let rewritten = self.tone.rewrite(raw);
        let action_items = self.extractor.extract_action_items(&rewritten);
        let metrics = self.extractor.extract_metrics(&rewritten);
        let text = self.tone.finish(rewritten);
        let confidence = confidence::score(&text, regime);
        let body = body::build(format, raw, &text, &action_items);

        Processed {
            text,
            action_items,
            metrics,
            confidence,
            body,
        }
    }
}

impl Default for PostProcessor {
    fn default() -> Self {
        Self::new()
    }
}
