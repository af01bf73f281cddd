//! Typed errors for the authoring library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! The taxonomy mirrors how failures are handled at run time:
//! - `Stage` failures abort the run and name the stage (Plan/Draft only;
//!   later stages degrade instead of failing).
//! - `Host` failures are surfaced by the publisher but absorbed during
//!   corpus loading.
//! - Everything else is absorbed close to where it happens.

use thiserror::Error;

/// Errors that can occur during authoring operations.
#[derive(Debug, Error)]
pub enum AuthoringError {
    /// A hard pipeline stage failed and the run cannot continue
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Model provider unavailable or failed
    #[error("model error: {0}")]
    Model(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Model output could not be parsed into the expected shape
    #[error("unparseable model output: {reason}")]
    Unparseable { reason: String },

    /// Plan failed structural validation
    #[error("invalid plan: {reason}")]
    InvalidPlan { reason: String },

    /// Publishing host operation failed
    #[error("host error: {0}")]
    Host(#[from] HostError),

    /// Media search failed
    #[error("media search error: {0}")]
    Media(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AuthoringError {
    /// Wrap an error as a hard stage failure.
    pub fn stage(
        stage: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Stage {
            stage,
            source: Box::new(source),
        }
    }

    /// Wrap a provider error.
    pub fn model(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Model(Box::new(source))
    }
}

/// Errors from the publishing host.
#[derive(Debug, Error)]
pub enum HostError {
    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Host returned a non-success status
    #[error("host rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Host response did not have the expected shape
    #[error("malformed host response: {0}")]
    Malformed(String),

    /// Credentials missing or unusable
    #[error("credentials error: {0}")]
    Credentials(String),
}

/// Result type alias for authoring operations.
pub type Result<T> = std::result::Result<T, AuthoringError>;

/// Result type alias for host operations.
pub type HostResult<T> = std::result::Result<T, HostError>;
