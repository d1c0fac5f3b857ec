//! Core types for model routing

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Model Tier
// ============================================================================

/// Model tier, ordered by cost (ascending)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// Cheap, fast model for simple requests
    Economy,
    /// Capable, expensive model
    Premium,
}

impl ModelTier {
    /// All tiers, cheapest first
    pub const ALL: [ModelTier; 2] = [ModelTier::Economy, ModelTier::Premium];

    /// Numeric level for tier comparison (lower = cheaper)
    #[must_use]
    pub fn level(&self) -> u8 {
        match self {
            ModelTier::Economy => 0,
            ModelTier::Premium => 1,
        }
    }

    /// Tier name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::Economy => "economy",
            ModelTier::Premium => "premium",
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "economy" => Ok(ModelTier::Economy),
            "premium" => Ok(ModelTier::Premium),
            other => Err(format!("unknown model tier: {other}")),
        }
    }
}

// ============================================================================
// Routing
// ============================================================================

/// Why a tier was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingReason {
    /// Caller forced a model or tier
    Forced,
    /// Score below the low threshold
    LowComplexity,
    /// Score above the high threshold
    HighComplexity,
    /// Score at or between the thresholds
    Uncertain,
}

impl RoutingReason {
    /// Reason name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forced => "forced",
            Self::LowComplexity => "low_complexity",
            Self::HighComplexity => "high_complexity",
            Self::Uncertain => "uncertain",
        }
    }
}

impl fmt::Display for RoutingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request context the router scores alongside the message
#[derive(Debug, Clone, Default)]
pub struct RoutingContext {
    /// Number of prior turns in the conversation
    pub conversation_length: usize,
    /// Whether the request carries tenant context
    pub has_tenant: bool,
    /// Whether tools are available to the model
    pub has_tools: bool,
    /// Tier name or model id that bypasses scoring
    pub force_model: Option<String>,
}

impl RoutingContext {
    /// Create an empty context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the conversation length
    #[must_use]
    pub fn with_conversation_length(mut self, len: usize) -> Self {
        self.conversation_length = len;
        self
    }

    /// Mark tenant context as present
    #[must_use]
    pub fn with_tenant(mut self, has_tenant: bool) -> Self {
        self.has_tenant = has_tenant;
        self
    }

    /// Mark tools as available
    #[must_use]
    pub fn with_tools(mut self, has_tools: bool) -> Self {
        self.has_tools = has_tools;
        self
    }

    /// Force a tier name or model id
    #[must_use]
    pub fn with_force_model(mut self, model: impl Into<String>) -> Self {
        self.force_model = Some(model.into());
        self
    }
}

/// Result of routing one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// Selected tier (the tier billed)
    pub tier: ModelTier,
    /// Model id sent to the completion service
    pub model: String,
    /// Why the tier was chosen
    pub reason: RoutingReason,
    /// Complexity score (zero when forced)
    pub score: i32,
}

/// Score thresholds separating the tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Scores strictly below this go to the economy tier
    pub low: i32,
    /// Scores strictly above this are high complexity
    pub high: i32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { low: 3, high: 6 }
    }
}

impl Thresholds {
    /// Map a score onto a tier
    #[must_use]
    pub fn classify(&self, score: i32) -> (ModelTier, RoutingReason) {
        if score < self.low {
            (ModelTier::Economy, RoutingReason::LowComplexity)
        } else if score > self.high {
            (ModelTier::Premium, RoutingReason::HighComplexity)
        } else {
            (ModelTier::Premium, RoutingReason::Uncertain)
        }
    }

    /// Shift both thresholds; `low` never drops below zero and `high` never below `low`
    #[must_use]
    pub fn shifted(&self, delta: i32) -> Self {
        let low = self.low.saturating_add(delta).max(0);
        let high = self.high.saturating_add(delta).max(low);
        Self { low, high }
    }
}
