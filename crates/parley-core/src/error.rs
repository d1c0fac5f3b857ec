//! Error types for parley-core
//!
//! Failures are grouped into a small taxonomy ([`ErrorKind`]) that decides
//! how a request ends. Tool failures never surface here: the dispatcher
//! turns them into failed tool results. Cache failures are swallowed by the
//! cache gate and only show up in logs.

use parley_llm::util::sanitize_error_for_user;
use serde::Serialize;
use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Completion client error
    #[error("llm error: {0}")]
    Llm(#[from] parley_llm::Error),

    /// Cache backend error
    #[error("cache error: {0}")]
    Cache(String),

    /// Transcript store error
    #[error("transcript error: {0}")]
    Transcript(String),

    /// The caller went away before the request finished
    #[error("request cancelled")]
    Cancelled,

    /// Internal error (serialization, join failures, etc.)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// How a failure is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Fatal at first use
    Configuration,
    /// Timeouts, 5xx, 429 and transport errors; the request fails without retry
    TransientNetwork,
    /// The completion service rejected the request
    Upstream,
    /// Cache backend unreachable; treated as a miss
    CacheUnavailable,
    /// Caller disconnected
    Cancelled,
    /// Anything else
    Internal,
}

impl Error {
    /// Classify this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Llm(parley_llm::Error::NotConfigured(_)) => ErrorKind::Configuration,
            Self::Llm(e) if e.is_transient() => ErrorKind::TransientNetwork,
            Self::Llm(_) => ErrorKind::Upstream,
            Self::Cache(_) => ErrorKind::CacheUnavailable,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Transcript(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Text safe to show the end user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Configuration => "The assistant is not configured correctly.".to_string(),
            ErrorKind::TransientNetwork => {
                "The assistant is temporarily unavailable. Please try again.".to_string()
            }
            ErrorKind::Upstream => sanitize_error_for_user(&self.to_string()),
            ErrorKind::Cancelled => "The request was cancelled.".to_string(),
            ErrorKind::CacheUnavailable | ErrorKind::Internal => {
                "Something went wrong while handling the request.".to_string()
            }
        }
    }
}
