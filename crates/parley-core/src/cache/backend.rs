//! Cache backends

use super::entry::CacheEntry;
use crate::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Writes between two full sweeps for expired entries
pub const PURGE_EVERY_WRITES: usize = 256;

/// Storage behind the dynamic cache
///
/// Keys are `(tenant_id, query_key)`; a backend never returns an entry
/// stored under another tenant.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Fetch an entry, `None` on miss
    async fn get(&self, tenant_id: &str, query_key: &str) -> Result<Option<CacheEntry>>;

    /// Store an entry, replacing any previous one under the same key
    async fn put(&self, entry: CacheEntry) -> Result<()>;
}

/// In-process backend
///
/// Data is lost on restart. Expired entries are dropped when they are next
/// read, by a full sweep every [`PURGE_EVERY_WRITES`] writes, and by the
/// task from [`spawn_purger`](Self::spawn_purger).
#[derive(Debug, Default)]
pub struct MemoryCacheBackend {
    entries: DashMap<(String, String), CacheEntry>,
    writes: AtomicUsize,
}

impl MemoryCacheBackend {
    /// Create an empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh());
        before.saturating_sub(self.entries.len())
    }

    /// Sweep expired entries every `every` until the backend is dropped
    pub fn spawn_purger(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let backend = Arc::downgrade(self);
        let every = every.max(Duration::from_millis(1));
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(every).await;
                let Some(backend) = backend.upgrade() else {
                    break;
                };
                let removed = backend.purge_expired();
                if removed > 0 {
                    debug!(removed, remaining = backend.len(), "Purged expired cache entries");
                }
            }
        })
    }

    /// Number of stored entries, fresh or not
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the backend holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheBackend for MemoryCacheBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, tenant_id: &str, query_key: &str) -> Result<Option<CacheEntry>> {
        let key = (tenant_id.to_string(), query_key.to_string());

        if let Some(entry) = self.entries.get(&key) {
            if entry.is_fresh() {
                return Ok(Some(entry.value().clone()));
            }
        }

        if self.entries.remove_if(&key, |_, entry| !entry.is_fresh()).is_some() {
            debug!(tenant = %tenant_id, "Dropped expired cache entry");
        }
        Ok(None)
    }

    async fn put(&self, entry: CacheEntry) -> Result<()> {
        let key = (entry.tenant_id.clone(), entry.query_key.clone());
        self.entries.insert(key, entry);

        if self.writes.fetch_add(1, Ordering::Relaxed) % PURGE_EVERY_WRITES
            == PURGE_EVERY_WRITES - 1
        {
            self.purge_expired();
        }
        Ok(())
    }
}
