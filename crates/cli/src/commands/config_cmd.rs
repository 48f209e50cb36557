//! `bizpilot config`: print the default or effective configuration.

use std::path::Path;

use bizpilot_config::AppConfig;

const REDACTED: &str = "[REDACTED]";

pub fn run(config_path: Option<&Path>, show: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !show {
        println!("# Default configuration");
        println!("# Save as {}", AppConfig::config_dir().join("config.toml").display());
        println!();
        println!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let config = super::load_config(config_path)?;
    let source = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"));

    println!("# Effective configuration ({})", source.display());
    println!("{}", toml::to_string_pretty(&redacted(config))?);
    Ok(())
}

/// Replace every API key with a marker.
fn redacted(mut config: AppConfig) -> AppConfig {
    if config.api_key.is_some() {
        config.api_key = Some(REDACTED.into());
    }
    for provider in config.providers.values_mut() {
        if provider.api_key.is_some() {
            provider.api_key = Some(REDACTED.into());
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizpilot_config::ProviderConfig;

    #[test]
    fn keys_are_redacted() {
        let mut config = AppConfig::default();
        config.api_key = Some("sk-ant-secret".into());
        config.providers.insert(
            "anthropic".into(),
            ProviderConfig {
                api_key: Some("sk-ant-other".into()),
                ..Default::default()
            },
        );

        let text = toml::to_string_pretty(&redacted(config)).unwrap();
        assert!(!text.contains("sk-ant"));
        assert!(text.contains(REDACTED));
    }

    #[test]
    fn missing_key_stays_absent() {
        let text = toml::to_string_pretty(&redacted(AppConfig::default())).unwrap();
        assert!(!text.contains(REDACTED));
    }
}
