//! Completion provider implementations for bizpilot.
//!
//! All providers implement the `bizpilot_core::Provider` trait.
//! [`build_from_config`] selects and constructs one from configuration.

pub mod anthropic;
pub mod factory;

pub use anthropic::AnthropicProvider;
pub use factory::{build_from_config, model_for};
