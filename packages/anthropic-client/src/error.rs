//! Error types for the Anthropic client.

use thiserror::Error;

/// Result type for Anthropic client operations.
pub type Result<T> = std::result::Result<T, AnthropicError>;

/// Anthropic client errors.
#[derive(Debug, Error)]
pub enum AnthropicError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response)
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response shape)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl AnthropicError {
    /// Whether a retry with backoff is worthwhile.
    ///
    /// Covers rate limits (429), overload (529), transient server
    /// errors and network failures.
    pub fn is_retryable(&self) -> bool {
        match self {
            AnthropicError::Network(_) => true,
            AnthropicError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
