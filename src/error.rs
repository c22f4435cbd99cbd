//! Error types for School Match.

use std::time::Duration;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },
}

/// Failures of the recommendation client. Every variant is shown to the
/// user as the same generic message.
#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Malformed recommendation response: {reason}")]
    MalformedResponse { reason: String },

    #[error("Recommendation request timed out after {0:?}")]
    Timeout(Duration),
}

/// Search session errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("A search is already in progress")]
    SearchInFlight,

    #[error("Search {generation} was superseded by a reset or newer search")]
    Superseded { generation: u64 },
}

/// Profile form errors.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Form is disabled while a search is in progress")]
    Disabled,

    #[error("Unknown form field: {0}")]
    UnknownField(String),
}

/// Input/output surface errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("IO error on channel {name}: {reason}")]
    Io { name: String, reason: String },
}
