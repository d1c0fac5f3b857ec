//! Anthropic - Messages API completion client
//!
//! Implements [`CompletionClient`](crate::provider::CompletionClient) over the
//! Anthropic Messages API with reqwest, both as a single request and as a
//! server-sent event stream.
//!
//! # Module Structure
//!
//! - `types`: configuration and wire types
//! - `convert`: request/response conversion
//! - `stream`: SSE event accumulation
//! - `security`: error sanitization
//! - `provider`: the client itself

/// Request and response conversion
pub mod convert;
/// Client implementation
pub mod provider;
/// Security and sanitization utilities
pub mod security;
/// Streaming event accumulation
pub mod stream;
/// API types and configuration
pub mod types;

#[cfg(test)]
mod tests;

pub use provider::AnthropicClient;
pub use stream::StreamAccumulator;
pub use types::{AnthropicConfig, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS};
