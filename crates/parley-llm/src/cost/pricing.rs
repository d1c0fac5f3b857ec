//! Tier pricing
//!
//! Prices are per 1M tokens in USD and static for the life of the process.

use crate::router::ModelTier;
use serde::{Deserialize, Serialize};

/// Claude Haiku 4.5 input cost per 1M tokens
pub const ECONOMY_INPUT_COST: f64 = 1.00;
/// Claude Haiku 4.5 output cost per 1M tokens
pub const ECONOMY_OUTPUT_COST: f64 = 5.00;
/// Claude Sonnet 4.5 input cost per 1M tokens
pub const PREMIUM_INPUT_COST: f64 = 3.00;
/// Claude Sonnet 4.5 output cost per 1M tokens
pub const PREMIUM_OUTPUT_COST: f64 = 15.00;

/// Price of one tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierPricing {
    /// Cost per 1M input tokens (USD)
    pub input_cost_per_million: f64,
    /// Cost per 1M output tokens (USD)
    pub output_cost_per_million: f64,
}

impl TierPricing {
    /// Create a price
    #[must_use]
    pub const fn new(input_cost_per_million: f64, output_cost_per_million: f64) -> Self {
        Self {
            input_cost_per_million,
            output_cost_per_million,
        }
    }

    /// Calculate cost for given token counts
    #[must_use]
    pub fn calculate_cost(&self, input_tokens: u32, output_tokens: u32) -> f64 {
        let input_cost = (f64::from(input_tokens) / 1_000_000.0) * self.input_cost_per_million;
        let output_cost = (f64::from(output_tokens) / 1_000_000.0) * self.output_cost_per_million;
        input_cost + output_cost
    }
}

/// Price of every tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceTable {
    /// Economy tier price
    pub economy: TierPricing,
    /// Premium tier price
    pub premium: TierPricing,
}

impl Default for PriceTable {
    fn default() -> Self {
        default_price_table()
    }
}

impl PriceTable {
    /// Price of a tier
    #[must_use]
    pub fn get(&self, tier: ModelTier) -> TierPricing {
        match tier {
            ModelTier::Economy => self.economy,
            ModelTier::Premium => self.premium,
        }
    }

    /// Cost of a request billed at `tier`
    #[must_use]
    pub fn cost_of(&self, tier: ModelTier, input_tokens: u32, output_tokens: u32) -> f64 {
        self.get(tier).calculate_cost(input_tokens, output_tokens)
    }

    /// Highest cost across all tiers for the same tokens
    #[must_use]
    pub fn max_cost(&self, input_tokens: u32, output_tokens: u32) -> f64 {
        ModelTier::ALL
            .into_iter()
            .map(|tier| self.cost_of(tier, input_tokens, output_tokens))
            .fold(0.0, f64::max)
    }

    /// Savings versus the most expensive tier; never negative
    #[must_use]
    pub fn savings_of(&self, tier: ModelTier, input_tokens: u32, output_tokens: u32) -> f64 {
        (self.max_cost(input_tokens, output_tokens) - self.cost_of(tier, input_tokens, output_tokens))
            .max(0.0)
    }
}

/// Default price table (Claude Haiku 4.5 / Sonnet 4.5)
#[must_use]
pub fn default_price_table() -> PriceTable {
    PriceTable {
        economy: TierPricing::new(ECONOMY_INPUT_COST, ECONOMY_OUTPUT_COST),
        premium: TierPricing::new(PREMIUM_INPUT_COST, PREMIUM_OUTPUT_COST),
    }
}
