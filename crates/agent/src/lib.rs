//! The bizpilot query pipeline.
//!
//! Each [`BusinessQuery`](bizpilot_core::BusinessQuery) goes through the
//! same steps:
//!
//! 1. **Overload check**: too many recent queries short-circuit to a canned reply
//! 2. **Classify** into a regime (support / exploration / balanced)
//! 3. **Assemble** a prompt from purpose, capabilities, session memory,
//!    knowledge, live business data and attachments
//! 4. **Complete** via the provider, with a timeout and a fallback reply
//! 5. **Post-process** into action items, metrics, confidence and a typed body

pub mod actions;
pub mod agent;
pub mod classifier;
pub mod context;
pub mod fallback;
pub mod postprocess;

#[cfg(test)]
mod test_helpers;

pub use actions::{ActionError, ActionInfo, PresetAction, build_query, catalog};
pub use agent::BusinessAgent;
pub use classifier::{REGIME_RULES, RegimeRule, classify};
pub use context::{AssembledPrompt, ContextAssembler};
pub use postprocess::{InsightExtractor, PatternExtractor, PlainBusinessTone, PostProcessor, ToneFilter};
