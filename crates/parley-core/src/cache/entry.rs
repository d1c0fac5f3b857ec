//! Cache entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A cached model answer
///
/// Entries are immutable; they are replaced or expire, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Owning tenant
    pub tenant_id: String,
    /// Normalized query
    pub query_key: String,
    /// Answer text
    pub response: String,
    /// Model that produced the answer
    pub model: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Time to live in milliseconds
    pub ttl_ms: u64,
}

impl CacheEntry {
    /// Create an entry stamped with the current time
    #[must_use]
    pub fn new(
        tenant_id: impl Into<String>,
        query_key: impl Into<String>,
        response: impl Into<String>,
        model: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            query_key: query_key.into(),
            response: response.into(),
            model: model.into(),
            created_at: Utc::now(),
            ttl_ms: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Override the creation time
    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// `now - created_at < ttl`
    #[must_use]
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        let age_ms = now.signed_duration_since(self.created_at).num_milliseconds();
        i128::from(age_ms) < i128::from(self.ttl_ms)
    }

    /// Freshness against the current time
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Utc::now())
    }
}
