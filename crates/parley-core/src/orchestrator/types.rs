//! Orchestrator types
//!
//! Response, stream event and tool call record types.

use parley_llm::{ModelTier, TokenUsage};
use serde::{Deserialize, Serialize};

/// Which cache layer answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheType {
    /// Static rule
    Static,
    /// Tenant-scoped dynamic cache
    Dynamic,
}

impl CacheType {
    /// Wire name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dynamic => "dynamic",
        }
    }
}

/// Stop reason reported for cache hits
pub const STOP_CACHE_HIT: &str = "cache_hit";

/// Stop reason reported when the iteration cap ended the loop
pub const STOP_MAX_ITERATIONS: &str = "max_iterations";

/// Record of one tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Tool name
    pub tool: String,
    /// Correlation id of the invocation
    pub correlation_id: String,
    /// Whether it succeeded
    pub success: bool,
    /// Wall-clock duration
    pub duration_ms: u64,
    /// Loop iteration that requested it (1-based)
    pub iteration: usize,
}

/// Synchronous chat response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Answer text
    pub content: String,
    /// Model that answered, `"cache"` for static rules
    pub model: String,
    /// Whether the answer came from cache
    pub from_cache: bool,
    /// Cache layer, when cached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_type: Option<CacheType>,
    /// Tier billed, `None` for cache hits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<ModelTier>,
    /// Tokens summed over all iterations
    pub usage: TokenUsage,
    /// Cost at the billed tier (USD)
    pub cost: f64,
    /// Cost avoided versus the most expensive tier (USD)
    pub savings: f64,
    /// Why the loop ended
    pub stop_reason: String,
    /// Completion calls made
    pub iterations: usize,
    /// Tool calls in execution order
    pub tool_calls: Vec<ToolCallRecord>,
}

impl ChatResponse {
    /// A response served from cache
    #[must_use]
    pub fn cached(content: impl Into<String>, model: impl Into<String>, cache_type: CacheType) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
            from_cache: true,
            cache_type: Some(cache_type),
            tier: None,
            usage: TokenUsage::default(),
            cost: 0.0,
            savings: 0.0,
            stop_reason: STOP_CACHE_HIT.to_string(),
            iterations: 0,
            tool_calls: Vec::new(),
        }
    }
}

/// Incremental output of a streaming request
///
/// Every stream ends with exactly one `Done` or `Error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Text delta
    Text {
        /// Text
        content: String,
    },
    /// A tool is about to run
    ToolStart {
        /// Tool name
        tool: String,
    },
    /// A tool finished
    ToolComplete {
        /// Tool name
        tool: String,
        /// Whether it succeeded
        success: bool,
    },
    /// The request finished
    Done {
        /// Why the loop ended
        stop_reason: String,
    },
    /// The request failed
    Error {
        /// User-facing message
        message: String,
    },
}

impl StreamEvent {
    /// Check if this event ends the stream
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Error { .. })
    }
}

/// What the loop produced before settlement
#[derive(Debug, Clone)]
pub(crate) struct LoopOutcome {
    /// Text of each iteration that produced any
    pub texts: Vec<String>,
    pub usage: TokenUsage,
    pub stop_reason: String,
    pub iterations: usize,
    pub tool_calls: Vec<ToolCallRecord>,
}

impl LoopOutcome {
    /// Final answer text
    pub fn content(&self) -> String {
        self.texts.join("\n\n")
    }
}
