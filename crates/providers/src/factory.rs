//! Provider construction from configuration.
//!
//! Construction is where configuration errors surface: a missing key or an
//! unsupported provider name fails here, before any query is served.

use std::sync::Arc;

use bizpilot_config::{AppConfig, ConfigError};
use bizpilot_core::provider::Provider;
use tracing::info;

use crate::anthropic::AnthropicProvider;

/// Build the configured completion provider.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ConfigError> {
    let api_key = config.require_api_key()?;
    let provider_config = config.providers.get(&config.default_provider);

    match config.default_provider.as_str() {
        "anthropic" => {
            let mut provider = AnthropicProvider::new(api_key);
            if let Some(url) = provider_config.and_then(|p| p.api_url.as_deref()) {
                provider = provider.with_base_url(url);
            }
            info!(provider = "anthropic", model = %model_for(config), "Completion provider ready");
            Ok(Arc::new(provider))
        }
        other => Err(ConfigError::ValidationError(format!(
            "unsupported provider '{other}' (supported: anthropic)"
        ))),
    }
}

/// The model to request: provider override first, then the global default.
pub fn model_for(config: &AppConfig) -> String {
    config
        .providers
        .get(&config.default_provider)
        .and_then(|p| p.default_model.clone())
        .unwrap_or_else(|| config.default_model.clone())
}
