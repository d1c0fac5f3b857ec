//! Cache gate - the short-circuit in front of the model

use super::backend::CacheBackend;
use super::entry::CacheEntry;
use super::static_rules::{normalize_query, StaticRules};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

/// Caching policy
#[derive(Debug, Clone)]
pub struct CachePolicy {
    /// Master switch for both layers
    pub enabled: bool,
    /// Lifetime of dynamic entries
    pub ttl: Duration,
    /// Responses must be shorter than this (in chars) to be stored
    pub max_response_chars: usize,
    /// Upper bound on any single backend call
    pub backend_timeout: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(3600),
            max_response_chars: 500,
            backend_timeout: Duration::from_secs(2),
        }
    }
}

impl CachePolicy {
    /// Set the entry lifetime
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the response size cap
    #[must_use]
    pub fn with_max_response_chars(mut self, max: usize) -> Self {
        self.max_response_chars = max;
        self
    }

    /// Set the backend call timeout
    #[must_use]
    pub fn with_backend_timeout(mut self, backend_timeout: Duration) -> Self {
        self.backend_timeout = backend_timeout;
        self
    }

    /// Disable caching entirely
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Whether an answer may be stored
    ///
    /// Only first-turn, tool-free exchanges with a short non-empty answer
    /// are cached.
    #[must_use]
    pub fn is_eligible(&self, history_len: usize, has_tools: bool, response: &str) -> bool {
        self.enabled
            && history_len == 0
            && !has_tools
            && !response.trim().is_empty()
            && response.chars().count() < self.max_response_chars
    }
}

/// Static rules plus an optional dynamic backend
pub struct CacheGate {
    rules: StaticRules,
    backend: Option<Arc<dyn CacheBackend>>,
    policy: CachePolicy,
}

impl Default for CacheGate {
    fn default() -> Self {
        Self::new(StaticRules::default(), CachePolicy::default())
    }
}

impl CacheGate {
    /// Create a gate with static rules only
    #[must_use]
    pub fn new(rules: StaticRules, policy: CachePolicy) -> Self {
        Self {
            rules,
            backend: None,
            policy,
        }
    }

    /// Attach a dynamic cache backend
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn CacheBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Get the policy
    #[must_use]
    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Get the static rules
    #[must_use]
    pub fn rules(&self) -> &StaticRules {
        &self.rules
    }

    /// Name of the dynamic backend, if any
    #[must_use]
    pub fn backend_name(&self) -> Option<&str> {
        self.backend.as_deref().map(|b| b.name())
    }

    /// Whether an answer may be stored
    #[must_use]
    pub fn is_eligible(&self, history_len: usize, has_tools: bool, response: &str) -> bool {
        self.policy.is_eligible(history_len, has_tools, response)
    }

    /// Static rule answer for a query; no side effects
    #[must_use]
    pub fn lookup_static(&self, query: &str) -> Option<String> {
        if !self.policy.enabled {
            return None;
        }
        self.rules.lookup(query).map(str::to_string)
    }

    /// Fresh cached answer for this tenant and query
    ///
    /// Backend errors and timeouts are logged and reported as a miss.
    #[instrument(skip(self, query), fields(tenant = %tenant_id))]
    pub async fn lookup_dynamic(&self, tenant_id: &str, query: &str) -> Option<CacheEntry> {
        if !self.policy.enabled {
            return None;
        }
        let backend = self.backend.as_ref()?;
        let key = normalize_query(query);
        if key.is_empty() {
            return None;
        }

        match timeout(self.policy.backend_timeout, backend.get(tenant_id, &key)).await {
            Ok(Ok(Some(entry))) if entry.tenant_id == tenant_id && entry.is_fresh() => {
                debug!(backend = backend.name(), "Dynamic cache hit");
                Some(entry)
            }
            Ok(Ok(_)) => None,
            Ok(Err(e)) => {
                warn!(backend = backend.name(), error = %e, "Cache lookup failed, treating as miss");
                None
            }
            Err(_) => {
                warn!(backend = backend.name(), "Cache lookup timed out, treating as miss");
                None
            }
        }
    }

    /// Store an answer; best-effort
    #[instrument(skip(self, query, response, model), fields(tenant = %tenant_id))]
    pub async fn store(&self, tenant_id: &str, query: &str, response: &str, model: &str) {
        if !self.policy.enabled {
            return;
        }
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        let key = normalize_query(query);
        if key.is_empty() {
            return;
        }

        let entry = CacheEntry::new(tenant_id, key, response, model, self.policy.ttl);
        match timeout(self.policy.backend_timeout, backend.put(entry)).await {
            Ok(Ok(())) => debug!(backend = backend.name(), "Cached response"),
            Ok(Err(e)) => warn!(backend = backend.name(), error = %e, "Cache write failed"),
            Err(_) => warn!(backend = backend.name(), "Cache write timed out"),
        }
    }
}
