//! Fallback - cancellable delayed tasks
//!
//! A fallback is work that should run after a delay unless something else
//! resolves first (e.g. notify a secondary contact if the primary has not
//! answered in ten minutes). Tasks are keyed; scheduling a key again
//! replaces the pending task, and [`FallbackScheduler::cancel`] aborts it.
//!
//! Pending fallbacks live in memory only and are lost on restart.

use dashmap::DashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

struct Pending {
    generation: u64,
    token: CancellationToken,
}

/// Scheduler for keyed delayed tasks
#[derive(Clone, Default)]
pub struct FallbackScheduler {
    pending: Arc<DashMap<String, Pending>>,
    generation: Arc<AtomicU64>,
}

impl FallbackScheduler {
    /// Create an empty scheduler
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay` unless cancelled first
    ///
    /// The returned handle resolves to `true` when the task ran.
    pub fn schedule<F>(&self, key: impl Into<String>, delay: Duration, task: F) -> JoinHandle<bool>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let key = key.into();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst);
        let token = CancellationToken::new();

        if let Some(previous) = self.pending.insert(
            key.clone(),
            Pending {
                generation,
                token: token.clone(),
            },
        ) {
            debug!(key = %key, "Replacing pending fallback");
            previous.token.cancel();
        }

        let pending = Arc::clone(&self.pending);
        tokio::spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(delay) => {
                    pending.remove_if(&key, |_, p| p.generation == generation);
                    info!(key = %key, "Running fallback");
                    task.await;
                    true
                }
                () = token.cancelled() => {
                    debug!(key = %key, "Fallback cancelled");
                    false
                }
            }
        })
    }

    /// Cancel a pending task; returns whether one was pending
    pub fn cancel(&self, key: &str) -> bool {
        match self.pending.remove(key) {
            Some((_, pending)) => {
                pending.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel everything (shutdown)
    pub fn cancel_all(&self) {
        for entry in self.pending.iter() {
            entry.value().token.cancel();
        }
        self.pending.clear();
    }

    /// Check if a task is pending under `key`
    #[must_use]
    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.contains_key(key)
    }

    /// Number of pending tasks
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn bump(runs: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let runs = Arc::clone(runs);
        async move {
            runs.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_fallback_runs_after_delay() {
        let scheduler = FallbackScheduler::new();
        let runs = Arc::new(AtomicUsize::new(0));

        let handle = scheduler.schedule("booking-42", Duration::from_millis(20), bump(&runs));
        assert!(scheduler.is_pending("booking-42"));

        assert!(handle.await.unwrap());
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!scheduler.is_pending("booking-42"));
    }

    #[tokio::test]
    async fn test_cancel_prevents_run() {
        let scheduler = FallbackScheduler::new();
        let runs = Arc::new(AtomicUsize::new(0));

        let handle = scheduler.schedule("booking-42", Duration::from_secs(10), bump(&runs));
        assert!(scheduler.cancel("booking-42"));
        assert!(!scheduler.cancel("booking-42"));

        assert!(!handle.await.unwrap());
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_reschedule_replaces_pending_task() {
        let scheduler = FallbackScheduler::new();
        let runs = Arc::new(AtomicUsize::new(0));

        let first = scheduler.schedule("k", Duration::from_secs(10), bump(&runs));
        let second = scheduler.schedule("k", Duration::from_millis(20), bump(&runs));

        assert!(!first.await.unwrap());
        assert!(second.await.unwrap());
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_all() {
        let scheduler = FallbackScheduler::new();
        let runs = Arc::new(AtomicUsize::new(0));

        let a = scheduler.schedule("a", Duration::from_secs(10), bump(&runs));
        let b = scheduler.schedule("b", Duration::from_secs(10), bump(&runs));
        scheduler.cancel_all();

        assert!(!a.await.unwrap());
        assert!(!b.await.unwrap());
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
