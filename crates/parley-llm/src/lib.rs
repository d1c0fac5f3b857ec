//! Parley LLM - Completion client abstraction
//!
//! This crate provides the model-facing half of Parley:
//! - Conversation types: turns, segments, tool invocations and results
//! - Completion client: trait plus the Anthropic Messages API client
//!   (synchronous and SSE streaming) and a scripted mock
//! - Router: complexity scoring and model tier selection
//! - Cost: price table and the usage/cost accountant

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod anthropic;
pub mod completion;
pub mod cost;
pub mod error;
pub mod message;
pub mod mock;
pub mod provider;
pub mod router;
pub mod tools;
pub mod util;

pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use cost::{
    default_price_table, format_snapshot, PriceTable, TierPricing, TierStats, UsageAccountant,
    UsageRecord, UsageSnapshot,
};
pub use error::{Error, Result};
pub use message::{Role, Segment, Turn, TurnContent};
pub use mock::MockCompletionClient;
pub use provider::CompletionClient;
pub use router::{
    ModelRouter, ModelTier, RouterConfig, RoutingContext, RoutingDecision, RoutingReason,
    Thresholds,
};
pub use tools::{ToolInvocation, ToolResult, ToolSchema};

pub use anthropic::{AnthropicClient, AnthropicConfig};
