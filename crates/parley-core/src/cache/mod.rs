//! Cache - static answers and tenant-scoped response cache
//!
//! Requests that can be answered without calling the model short-circuit
//! here. Two layers are consulted in order:
//! 1. Static rules: fixed query → answer pairs, matched after normalization
//! 2. Dynamic cache: previous model answers, keyed by tenant and query,
//!    served only while fresh
//!
//! The gate fails open: an unreachable backend is a miss, and writes are
//! best-effort.
//!
//! # Module Structure
//!
//! - `static_rules`: query normalization and the static rule table
//! - `entry`: `CacheEntry` and freshness
//! - `backend`: `CacheBackend` trait and the in-memory backend
//! - `redis_backend`: Redis backend (`PSETEX` with the entry TTL)
//! - `gate`: `CacheGate` and `CachePolicy`

mod backend;
mod entry;
mod gate;
mod redis_backend;
mod static_rules;

#[cfg(test)]
mod tests;

pub use backend::{CacheBackend, MemoryCacheBackend, PURGE_EVERY_WRITES};
pub use entry::CacheEntry;
pub use gate::{CacheGate, CachePolicy};
pub use redis_backend::RedisCacheBackend;
pub use static_rules::{normalize_query, StaticRule, StaticRules};
