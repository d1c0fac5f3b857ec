//! Redis cache backend

use super::backend::CacheBackend;
use super::entry::CacheEntry;
use crate::error::{Error, Result};
use async_trait::async_trait;
use tracing::debug;

/// Default key prefix
pub const DEFAULT_PREFIX: &str = "parley:cache:";

/// Redis-backed cache (for multi-instance deployments)
///
/// Entries are stored as JSON under `<prefix><tenant>:<query>` with `PSETEX`,
/// so Redis expires them on its own. Query keys are normalized and contain
/// no `:`, which keeps keys of different tenants apart.
pub struct RedisCacheBackend {
    client: redis::Client,
    prefix: String,
}

impl RedisCacheBackend {
    /// Create a new Redis backend
    ///
    /// # Errors
    ///
    /// Returns error if Redis URL is invalid
    pub fn new(redis_url: &str) -> Result<Self> {
        Self::with_prefix(redis_url, DEFAULT_PREFIX)
    }

    /// Create with a custom key prefix
    ///
    /// # Errors
    ///
    /// Returns error if Redis URL is invalid
    pub fn with_prefix(redis_url: &str, prefix: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url).map_err(|e| Error::Cache(e.to_string()))?;

        Ok(Self {
            client,
            prefix: prefix.to_string(),
        })
    }

    /// Build the full Redis key
    pub(crate) fn build_key(&self, tenant_id: &str, query_key: &str) -> String {
        format!("{}{}:{}", self.prefix, tenant_id, query_key)
    }

    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| Error::Cache(format!("Redis connection failed: {}", e)))
    }
}

#[async_trait]
impl CacheBackend for RedisCacheBackend {
    fn name(&self) -> &str {
        "redis"
    }

    async fn get(&self, tenant_id: &str, query_key: &str) -> Result<Option<CacheEntry>> {
        let mut conn = self.get_connection().await?;
        let key = self.build_key(tenant_id, query_key);

        let data: Option<String> = redis::cmd("GET")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::Cache(format!("Redis GET failed: {}", e)))?;

        let Some(json) = data else {
            return Ok(None);
        };

        let entry: CacheEntry = serde_json::from_str(&json)
            .map_err(|e| Error::Cache(format!("Failed to deserialize cache entry: {}", e)))?;
        Ok(Some(entry))
    }

    async fn put(&self, entry: CacheEntry) -> Result<()> {
        // PSETEX rejects a zero TTL
        if entry.ttl_ms == 0 {
            return Ok(());
        }

        let mut conn = self.get_connection().await?;
        let key = self.build_key(&entry.tenant_id, &entry.query_key);

        let json = serde_json::to_string(&entry)
            .map_err(|e| Error::Internal(format!("Failed to serialize cache entry: {}", e)))?;

        redis::cmd("PSETEX")
            .arg(&key)
            .arg(entry.ttl_ms)
            .arg(&json)
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| Error::Cache(format!("Redis PSETEX failed: {}", e)))?;

        debug!(tenant = %entry.tenant_id, ttl_ms = entry.ttl_ms, "Cache entry saved to Redis");
        Ok(())
    }
}
