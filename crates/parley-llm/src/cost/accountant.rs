//! Usage accountant
//!
//! A single mutex-guarded aggregate; `record` is a handful of additions so
//! the lock is never held across an await.

use super::pricing::PriceTable;
use super::record::{TierStats, UsageRecord, UsageSnapshot};
use crate::router::ModelTier;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::debug;

#[derive(Debug, Default)]
struct Aggregate {
    total_requests: u64,
    cache_hits: u64,
    total_input_tokens: u64,
    total_output_tokens: u64,
    total_cost: f64,
    estimated_savings: f64,
    by_tier: BTreeMap<ModelTier, TierStats>,
}

/// Running usage and cost counters shared by all requests
#[derive(Debug)]
pub struct UsageAccountant {
    prices: PriceTable,
    inner: Mutex<Aggregate>,
}

impl Default for UsageAccountant {
    fn default() -> Self {
        Self::new(PriceTable::default())
    }
}

impl UsageAccountant {
    /// Create an accountant with a price table
    #[must_use]
    pub fn new(prices: PriceTable) -> Self {
        Self {
            prices,
            inner: Mutex::new(Aggregate::default()),
        }
    }

    /// Price table in use
    #[must_use]
    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    /// Cost of tokens billed at `tier`
    #[must_use]
    pub fn cost_of(&self, tier: ModelTier, input_tokens: u32, output_tokens: u32) -> f64 {
        self.prices.cost_of(tier, input_tokens, output_tokens)
    }

    /// Savings of tokens billed at `tier` versus the most expensive tier
    #[must_use]
    pub fn savings_of(&self, tier: ModelTier, input_tokens: u32, output_tokens: u32) -> f64 {
        self.prices.savings_of(tier, input_tokens, output_tokens)
    }

    /// Fold one record into the counters; returns the record's cost
    pub fn record(&self, record: &UsageRecord) -> f64 {
        let (cost, savings) = match record.tier {
            Some(tier) => (
                self.cost_of(tier, record.input_tokens, record.output_tokens),
                self.savings_of(tier, record.input_tokens, record.output_tokens),
            ),
            None => (0.0, 0.0),
        };

        let mut agg = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        agg.total_requests += 1;
        agg.total_input_tokens += u64::from(record.input_tokens);
        agg.total_output_tokens += u64::from(record.output_tokens);
        agg.total_cost += cost;
        agg.estimated_savings += savings;

        if record.cache_hit {
            agg.cache_hits += 1;
        } else if let Some(tier) = record.tier {
            let stats = agg.by_tier.entry(tier).or_default();
            stats.requests += 1;
            stats.input_tokens += u64::from(record.input_tokens);
            stats.output_tokens += u64::from(record.output_tokens);
            stats.cost += cost;
        }
        drop(agg);

        debug!(
            tier = ?record.tier,
            input_tokens = record.input_tokens,
            output_tokens = record.output_tokens,
            cache_hit = record.cache_hit,
            cost,
            "Usage recorded"
        );
        cost
    }

    /// Copy of the current counters
    #[must_use]
    pub fn snapshot(&self) -> UsageSnapshot {
        let agg = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let cache_hit_rate = if agg.total_requests == 0 {
            0.0
        } else {
            agg.cache_hits as f64 / agg.total_requests as f64
        };

        UsageSnapshot {
            total_requests: agg.total_requests,
            cache_hits: agg.cache_hits,
            total_input_tokens: agg.total_input_tokens,
            total_output_tokens: agg.total_output_tokens,
            total_cost: agg.total_cost,
            estimated_savings: agg.estimated_savings,
            cache_hit_rate,
            by_tier: agg.by_tier.clone(),
        }
    }

    /// Zero every counter
    pub fn reset(&self) {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner()) = Aggregate::default();
    }
}
