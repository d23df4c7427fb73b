//! Retrieval transport errors.

use thiserror::Error;

/// Failures at the retrieval boundary. None of these are retried by the
/// pipeline; escalation only reacts to data-quality issues.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("retrieval timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The service answered, but not with a parseable facts payload.
    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("retrieval endpoint or API key is not configured")]
    NotConfigured,
}

impl TransportError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed(reason.into())
    }
}
