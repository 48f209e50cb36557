//! Configuration loading, validation, and management for bizpilot.
//!
//! Loads configuration from `~/.bizpilot/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.bizpilot/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Completion provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Completion model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Query pipeline limits
    #[serde(default)]
    pub agent: AgentConfig,

    /// Cost estimation
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Live business data access
    #[serde(default)]
    pub data: DataConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "anthropic".into()
}
fn default_model() -> String {
    "claude-3-5-haiku-20241022".into()
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("agent", &self.agent)
            .field("pricing", &self.pricing)
            .field("data", &self.data)
            .field("gateway", &self.gateway)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Informational token quota per cycle; never enforced
    #[serde(default = "default_token_budget")]
    pub token_budget: u64,

    /// Hard ceiling on the per-request output size
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "default_completion_timeout_secs")]
    pub completion_timeout_secs: u64,

    /// Sliding window for overload detection
    #[serde(default = "default_overload_window_secs")]
    pub overload_window_secs: u64,

    /// Requests allowed inside the window before short-circuiting
    #[serde(default = "default_overload_threshold")]
    pub overload_threshold: usize,

    /// Recent-query entries older than this are dropped on cache clear
    #[serde(default = "default_recent_query_retention_secs")]
    pub recent_query_retention_secs: u64,

    #[serde(default = "default_session_memory_size")]
    pub session_memory_size: usize,
}

fn default_token_budget() -> u64 {
    10_000
}
fn default_max_output_tokens() -> u32 {
    2_000
}
fn default_completion_timeout_secs() -> u64 {
    30
}
fn default_overload_window_secs() -> u64 {
    60
}
fn default_overload_threshold() -> usize {
    20
}
fn default_recent_query_retention_secs() -> u64 {
    3_600
}
fn default_session_memory_size() -> usize {
    10
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            token_budget: default_token_budget(),
            max_output_tokens: default_max_output_tokens(),
            completion_timeout_secs: default_completion_timeout_secs(),
            overload_window_secs: default_overload_window_secs(),
            overload_threshold: default_overload_threshold(),
            recent_query_retention_secs: default_recent_query_retention_secs(),
            session_memory_size: default_session_memory_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Flat rate applied to input and output tokens alike
    #[serde(default = "default_usd_per_million_tokens")]
    pub usd_per_million_tokens: f64,
}

fn default_usd_per_million_tokens() -> f64 {
    0.80
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            usd_per_million_tokens: default_usd_per_million_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Base URL of the ERP REST API; deep context is a placeholder without it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_cache_ttl_secs() -> u64 {
    30
}
fn default_request_timeout_secs() -> u64 {
    5
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            cache_ttl_secs: default_cache_ttl_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Origin allowed by CORS
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_cors_origin() -> String {
    "http://localhost:3000".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            cors_origin: default_cors_origin(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.bizpilot/config.toml).
    ///
    /// Also checks environment variables:
    /// - `BIZPILOT_API_KEY` (highest priority), then `ANTHROPIC_API_KEY`
    /// - `BIZPILOT_MODEL`
    /// - `BIZPILOT_DATA_URL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        Self::load_with_env(&config_path)
    }

    /// Load from `path`, then apply environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("BIZPILOT_API_KEY")
                .ok()
                .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
                .filter(|k| !k.trim().is_empty());
        }

        if let Ok(model) = std::env::var("BIZPILOT_MODEL") {
            config.default_model = model;
        }

        if let Ok(url) = std::env::var("BIZPILOT_DATA_URL") {
            config.data.base_url = Some(url);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".bizpilot")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "default_model must not be empty".into(),
            ));
        }

        if self.agent.max_output_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_output_tokens must be > 0".into(),
            ));
        }

        if self.agent.completion_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "agent.completion_timeout_secs must be > 0".into(),
            ));
        }

        if self.agent.overload_window_secs == 0 || self.agent.overload_threshold == 0 {
            return Err(ConfigError::ValidationError(
                "agent.overload_window_secs and agent.overload_threshold must be > 0".into(),
            ));
        }

        if !self.pricing.usd_per_million_tokens.is_finite() || self.pricing.usd_per_million_tokens < 0.0 {
            return Err(ConfigError::ValidationError(
                "pricing.usd_per_million_tokens must be a non-negative number".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.resolved_api_key().is_some()
    }

    /// The key for the default provider: provider section first, then top level.
    pub fn resolved_api_key(&self) -> Option<&str> {
        self.providers
            .get(&self.default_provider)
            .and_then(|p| p.api_key.as_deref())
            .or(self.api_key.as_deref())
            .filter(|k| !k.trim().is_empty())
    }

    /// Fail fast when no credential is configured.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.resolved_api_key()
            .ok_or_else(|| ConfigError::MissingApiKey(self.default_provider.clone()))
    }

    /// Generate a default config TOML string (for the `config` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            agent: AgentConfig::default(),
            pricing: PricingConfig::default(),
            data: DataConfig::default(),
            gateway: GatewayConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("No API key configured for provider '{0}' (set ANTHROPIC_API_KEY or api_key in config.toml)")]
    MissingApiKey(String),
}
