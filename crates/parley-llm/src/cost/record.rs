//! Usage records and snapshots

use crate::completion::TokenUsage;
use crate::router::ModelTier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One completed request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Tier billed; `None` when no model was called
    pub tier: Option<ModelTier>,
    /// Input tokens across all iterations
    pub input_tokens: u32,
    /// Output tokens across all iterations
    pub output_tokens: u32,
    /// Whether the request was answered from cache
    pub cache_hit: bool,
}

impl UsageRecord {
    /// A request answered by the model
    #[must_use]
    pub fn billed(tier: ModelTier, usage: TokenUsage) -> Self {
        Self {
            tier: Some(tier),
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            cache_hit: false,
        }
    }

    /// A request answered from cache (zero tokens)
    #[must_use]
    pub fn cache_hit() -> Self {
        Self {
            tier: None,
            input_tokens: 0,
            output_tokens: 0,
            cache_hit: true,
        }
    }
}

/// Per-tier counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TierStats {
    /// Billed requests
    pub requests: u64,
    /// Input tokens
    pub input_tokens: u64,
    /// Output tokens
    pub output_tokens: u64,
    /// Cost (USD)
    pub cost: f64,
}

/// Point-in-time view of the accountant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// All recorded requests, including cache hits
    pub total_requests: u64,
    /// Requests answered from cache
    pub cache_hits: u64,
    /// Total input tokens
    pub total_input_tokens: u64,
    /// Total output tokens
    pub total_output_tokens: u64,
    /// Total cost (USD)
    pub total_cost: f64,
    /// Cost avoided versus the most expensive tier (USD)
    pub estimated_savings: f64,
    /// `cache_hits / total_requests`, zero when empty
    pub cache_hit_rate: f64,
    /// Billed requests per tier
    pub by_tier: BTreeMap<ModelTier, TierStats>,
}
