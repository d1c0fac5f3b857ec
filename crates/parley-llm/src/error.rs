//! Error types for parley-llm

use thiserror::Error;

/// LLM error type
#[derive(Debug, Error)]
pub enum Error {
    /// Client not configured (missing credentials or settings)
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// API error returned by the completion service
    #[error("api error: {0}")]
    Api(String),

    /// Completion service returned a 5xx status
    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Sanitized message
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded")]
    RateLimit,

    /// Invalid response
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Network error
    #[error("network error: {0}")]
    Network(String),

    /// Timeout
    #[error("timeout after {0}ms")]
    Timeout(u64),

    /// Stream ended or failed mid-response
    #[error("stream error: {0}")]
    Stream(String),
}

impl Error {
    /// Whether the failure is transient (timeouts, 5xx, throttling, transport)
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Server { .. } | Self::RateLimit | Self::Network(_) | Self::Timeout(_) | Self::Stream(_)
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
