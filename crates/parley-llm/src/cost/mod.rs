//! Cost - price table and usage/cost accounting
//!
//! Every completed request produces one [`UsageRecord`]. The
//! [`UsageAccountant`] folds records into running counters and reports
//! totals, per-tier counts, cache hit rate and the savings obtained by not
//! sending everything to the most expensive tier.
//!
//! # Module Structure
//!
//! - `pricing`: per-tier price table
//! - `record`: usage records and snapshot types
//! - `accountant`: the shared aggregate
//! - `report`: text rendering of a snapshot

mod accountant;
mod pricing;
mod record;
mod report;


pub use accountant::UsageAccountant;
pub use pricing::{default_price_table, PriceTable, TierPricing};
pub use record::{TierStats, UsageRecord, UsageSnapshot};
pub use report::format_snapshot;
