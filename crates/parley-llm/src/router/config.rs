//! Configuration for model routing

use super::types::{ModelTier, Thresholds};
use serde::{Deserialize, Serialize};

/// Default economy-tier model (Claude Haiku 4.5, $1/$5 per 1M tokens)
pub const DEFAULT_ECONOMY_MODEL: &str = "claude-haiku-4-5-20251001";

/// Default premium-tier model (Claude Sonnet 4.5, $3/$15 per 1M tokens)
pub const DEFAULT_PREMIUM_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Router configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Model id used for the economy tier
    pub economy_model: String,
    /// Model id used for the premium tier
    pub premium_model: String,
    /// Initial score thresholds
    pub thresholds: Thresholds,
    /// Words that mark money-related requests
    pub financial_terms: Vec<String>,
    /// Phrases that mark unclear intent
    pub ambiguous_phrases: Vec<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            economy_model: DEFAULT_ECONOMY_MODEL.to_string(),
            premium_model: DEFAULT_PREMIUM_MODEL.to_string(),
            thresholds: Thresholds::default(),
            financial_terms: [
                "price", "pricing", "cost", "invoice", "refund", "payment", "deposit", "balance",
                "quote", "discount", "fee", "tax", "budget", "charge", "billing",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            ambiguous_phrases: [
                "not sure",
                "maybe",
                "i think",
                "or something",
                "depends",
                "what if",
                "either",
                "confused",
                "something like",
                "does not work",
                "doesn't work",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl RouterConfig {
    /// Model id configured for a tier
    #[must_use]
    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Economy => &self.economy_model,
            ModelTier::Premium => &self.premium_model,
        }
    }

    /// Tier a configured model id belongs to
    #[must_use]
    pub fn tier_of(&self, model: &str) -> Option<ModelTier> {
        ModelTier::ALL
            .into_iter()
            .find(|tier| self.model_for(*tier) == model)
    }
}
