//! Tests for cache module

use super::*;
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn hours_rules() -> StaticRules {
    StaticRules::from_rules(&[
        StaticRule::new("What are your hours?", "We're open 9am to 6pm, Monday to Saturday."),
        StaticRule::new("thanks", "You're welcome!"),
    ])
}

fn gate_with(backend: Arc<dyn CacheBackend>) -> CacheGate {
    CacheGate::new(hours_rules(), CachePolicy::default()).with_backend(backend)
}

struct FailingBackend {
    calls: AtomicUsize,
}

#[async_trait]
impl CacheBackend for FailingBackend {
    fn name(&self) -> &str {
        "failing"
    }

    async fn get(&self, _tenant_id: &str, _query_key: &str) -> Result<Option<CacheEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::Cache("connection refused".into()))
    }

    async fn put(&self, _entry: CacheEntry) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::Cache("connection refused".into()))
    }
}

struct HangingBackend;

#[async_trait]
impl CacheBackend for HangingBackend {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn get(&self, _tenant_id: &str, _query_key: &str) -> Result<Option<CacheEntry>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(None)
    }

    async fn put(&self, _entry: CacheEntry) -> Result<()> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }
}

#[test]
fn test_normalize_query() {
    assert_eq!(normalize_query("What are your hours?"), "what are your hours");
    assert_eq!(normalize_query("  what   ARE your\thours  "), "what are your hours");
    assert_eq!(normalize_query("what's up"), "whats up");
    assert_eq!(normalize_query("?!..."), "");
}

#[test]
fn test_static_rules_match_after_normalization() {
    let rules = hours_rules();
    assert_eq!(rules.len(), 2);
    assert!(rules.lookup("WHAT are your hours").is_some());
    assert!(rules.lookup("what are your hours!!").is_some());
    assert_eq!(rules.lookup("Thanks!"), Some("You're welcome!"));
    assert!(rules.lookup("what are your hours tomorrow").is_none());
}

#[test]
fn test_static_rules_skip_empty_patterns() {
    let mut rules = StaticRules::new();
    rules.insert("???", "never");
    assert!(rules.is_empty());
}

#[test]
fn test_entry_freshness() {
    let now = Utc::now();
    let entry = CacheEntry::new("t1", "q", "a", "m", Duration::from_secs(60))
        .with_created_at(now - ChronoDuration::seconds(30));
    assert!(entry.is_fresh_at(now));
    assert!(!entry.is_fresh_at(now + ChronoDuration::seconds(30)));
    assert!(!entry.is_fresh_at(now + ChronoDuration::seconds(31)));

    let zero = CacheEntry::new("t1", "q", "a", "m", Duration::ZERO).with_created_at(now);
    assert!(!zero.is_fresh_at(now));
}

#[test]
fn test_policy_eligibility() {
    let policy = CachePolicy::default().with_max_response_chars(20);
    assert!(policy.is_eligible(0, false, "short answer"));
    assert!(!policy.is_eligible(1, false, "short answer"));
    assert!(!policy.is_eligible(0, true, "short answer"));
    assert!(!policy.is_eligible(0, false, "   "));
    assert!(!policy.is_eligible(0, false, &"x".repeat(20)));
    assert!(policy.is_eligible(0, false, &"x".repeat(19)));
    assert!(!CachePolicy::disabled().is_eligible(0, false, "short answer"));
}

#[tokio::test]
async fn test_memory_backend_is_tenant_scoped() {
    let backend = Arc::new(MemoryCacheBackend::new());
    let gate = gate_with(backend.clone());

    gate.store("tenant-a", "Do you offer gift cards?", "Yes, in any amount.", "haiku")
        .await;

    let hit = gate.lookup_dynamic("tenant-a", "do you offer gift cards").await;
    assert_eq!(hit.map(|e| e.response), Some("Yes, in any amount.".to_string()));
    assert!(gate.lookup_dynamic("tenant-b", "Do you offer gift cards?").await.is_none());
    assert_eq!(backend.len(), 1);
}

#[tokio::test]
async fn test_memory_backend_drops_expired_entries() {
    let backend = MemoryCacheBackend::new();
    let stale = CacheEntry::new("t", "q", "old", "m", Duration::from_secs(10))
        .with_created_at(Utc::now() - ChronoDuration::seconds(11));
    backend.put(stale).await.unwrap();
    backend
        .put(CacheEntry::new("t", "fresh", "new", "m", Duration::from_secs(10)))
        .await
        .unwrap();

    assert!(backend.get("t", "q").await.unwrap().is_none());
    assert_eq!(backend.len(), 1);

    let stale = CacheEntry::new("t", "q2", "old", "m", Duration::from_secs(1))
        .with_created_at(Utc::now() - ChronoDuration::seconds(5));
    backend.put(stale).await.unwrap();
    assert_eq!(backend.purge_expired(), 1);
    assert_eq!(backend.len(), 1);
}

#[test]
fn test_entry_freshness_with_sub_second_ttl() {
    let now = Utc::now();
    let entry = CacheEntry::new("t1", "q", "a", "m", Duration::from_millis(500)).with_created_at(now);
    assert_eq!(entry.ttl_ms, 500);
    assert!(entry.is_fresh_at(now));
    assert!(entry.is_fresh_at(now + ChronoDuration::milliseconds(499)));
    assert!(!entry.is_fresh_at(now + ChronoDuration::milliseconds(500)));
}

#[tokio::test]
async fn test_memory_backend_sweeps_expired_entries_on_write() {
    let backend = MemoryCacheBackend::new();
    let past = Utc::now() - ChronoDuration::seconds(5);
    for i in 0..PURGE_EVERY_WRITES - 1 {
        let entry = CacheEntry::new("t", format!("q{i}"), "a", "m", Duration::from_secs(1))
            .with_created_at(past);
        backend.put(entry).await.unwrap();
    }
    assert_eq!(backend.len(), PURGE_EVERY_WRITES - 1);

    backend
        .put(CacheEntry::new("t", "fresh", "a", "m", Duration::from_secs(60)))
        .await
        .unwrap();
    assert_eq!(backend.len(), 1);
    assert!(backend.get("t", "fresh").await.unwrap().is_some());
}

#[tokio::test]
async fn test_purger_removes_entries_nobody_reads() {
    let backend = Arc::new(MemoryCacheBackend::new());
    for i in 0..100 {
        backend
            .put(CacheEntry::new("t", format!("q{i}"), "a", "m", Duration::from_millis(10)))
            .await
            .unwrap();
    }
    assert_eq!(backend.len(), 100);

    let purger = backend.spawn_purger(Duration::from_millis(20));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(backend.is_empty());
    purger.abort();
}

#[tokio::test]
async fn test_purger_stops_when_backend_is_dropped() {
    let backend = Arc::new(MemoryCacheBackend::new());
    let purger = backend.spawn_purger(Duration::from_millis(5));
    drop(backend);

    let finished = tokio::time::timeout(Duration::from_secs(1), purger).await;
    assert!(finished.is_ok());
}

#[tokio::test]
async fn test_gate_fails_open_on_backend_errors() {
    let backend = Arc::new(FailingBackend {
        calls: AtomicUsize::new(0),
    });
    let gate = gate_with(backend.clone());

    assert!(gate.lookup_dynamic("t", "anything").await.is_none());
    gate.store("t", "anything", "answer", "m").await;
    assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_gate_times_out_slow_backend() {
    let gate = CacheGate::new(
        StaticRules::new(),
        CachePolicy::default().with_backend_timeout(Duration::from_millis(50)),
    )
    .with_backend(Arc::new(HangingBackend));

    let start = std::time::Instant::now();
    assert!(gate.lookup_dynamic("t", "anything").await.is_none());
    gate.store("t", "anything", "answer", "m").await;
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_disabled_gate_answers_nothing() {
    let backend = Arc::new(MemoryCacheBackend::new());
    let gate =
        CacheGate::new(hours_rules(), CachePolicy::disabled()).with_backend(backend.clone());

    assert!(gate.lookup_static("What are your hours?").is_none());
    gate.store("t", "q", "a", "m").await;
    assert!(backend.is_empty());
}

#[tokio::test]
async fn test_gate_without_backend_only_serves_static() {
    let gate = CacheGate::new(hours_rules(), CachePolicy::default());
    assert!(gate.backend_name().is_none());
    assert!(gate.lookup_static("what are your hours").is_some());
    gate.store("t", "q", "a", "m").await;
    assert!(gate.lookup_dynamic("t", "q").await.is_none());
}

#[test]
fn test_redis_key_layout() {
    let backend = RedisCacheBackend::new("redis://127.0.0.1:6379").unwrap();
    assert_eq!(
        backend.build_key("tenant-a", "what are your hours"),
        "parley:cache:tenant-a:what are your hours"
    );
    assert!(RedisCacheBackend::new("not a url").is_err());
}

// Run with: cargo test --features redis-tests
#[cfg(feature = "redis-tests")]
mod redis_tests {
    use super::*;

    #[tokio::test]
    async fn test_redis_round_trip() {
        let backend = RedisCacheBackend::with_prefix("redis://127.0.0.1:6379", "parley:test:")
            .unwrap();
        backend
            .put(CacheEntry::new("t1", "gift cards", "Yes", "haiku", Duration::from_secs(30)))
            .await
            .unwrap();

        let entry = backend.get("t1", "gift cards").await.unwrap().unwrap();
        assert_eq!(entry.response, "Yes");
        assert!(backend.get("t2", "gift cards").await.unwrap().is_none());
    }
}
