//! Error types for the bizpilot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all bizpilot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Data source / attachment errors ---
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    // --- Inbound query errors ---
    #[error("Invalid query: {0}")]
    Query(#[from] QueryError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Failures of the optional context collaborators (live data, attachments).
///
/// These never reach the caller of the agent; the assembler logs them and
/// carries on without the fragment.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("Data source unavailable: {0}")]
    Unavailable(String),

    #[error("Data source returned {status} for {endpoint}")]
    Http { endpoint: String, status: u16 },

    #[error("Could not decode {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("Attachment processing failed: {0}")]
    Attachment(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("task must not be empty")]
    EmptyTask,

    #[error("unknown {field}: '{value}'")]
    UnknownValue { field: &'static str, value: String },
}
