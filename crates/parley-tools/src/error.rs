//! Error types for parley-tools

use thiserror::Error;

/// Capability error type
#[derive(Debug, Error)]
pub enum Error {
    /// Capability ran and failed
    #[error("execution failed: {0}")]
    Execution(String),

    /// Input did not match the capability's schema
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Capability did not answer within the per-call timeout
    #[error("timed out after {0}ms")]
    Timeout(u64),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
