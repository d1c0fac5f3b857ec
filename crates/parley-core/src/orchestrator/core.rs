//! Orchestrator core structure
//!
//! Contains the main `Orchestrator` struct and its builder methods.

use crate::cache::CacheGate;
use crate::transcript::TranscriptStore;
use parley_llm::{CompletionClient, ModelRouter, UsageAccountant};
use parley_tools::{CapabilityRegistry, ToolDispatcher};
use std::sync::Arc;
use tracing::info;

use super::config::OrchestratorConfig;

/// Main orchestrator that coordinates one request at a time per call
///
/// Only the cache gate and the accountant are shared between requests;
/// everything else about a request lives on the stack of its loop.
pub struct Orchestrator {
    pub(crate) client: Arc<dyn CompletionClient>,
    pub(crate) router: Arc<ModelRouter>,
    pub(crate) dispatcher: ToolDispatcher,
    pub(crate) cache: Arc<CacheGate>,
    pub(crate) accountant: Arc<UsageAccountant>,
    pub(crate) transcripts: Option<Arc<dyn TranscriptStore>>,
    pub(crate) config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create a new orchestrator
    ///
    /// Starts with no capabilities, a cache gate without rules or backend and
    /// a fresh accountant priced with the default table.
    #[must_use]
    pub fn new(
        client: Arc<dyn CompletionClient>,
        router: Arc<ModelRouter>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            client,
            router,
            dispatcher: ToolDispatcher::with_defaults(Arc::new(CapabilityRegistry::new())),
            cache: Arc::new(CacheGate::default()),
            accountant: Arc::new(UsageAccountant::default()),
            transcripts: None,
            config,
        }
    }

    /// Set the tool dispatcher
    #[must_use]
    pub fn with_dispatcher(mut self, dispatcher: ToolDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Set the cache gate
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<CacheGate>) -> Self {
        self.cache = cache;
        self
    }

    /// Set the usage accountant
    #[must_use]
    pub fn with_accountant(mut self, accountant: Arc<UsageAccountant>) -> Self {
        self.accountant = accountant;
        self
    }

    /// Set the transcript store
    #[must_use]
    pub fn with_transcripts(mut self, store: Arc<dyn TranscriptStore>) -> Self {
        self.transcripts = Some(store);
        self
    }

    /// Log the assembled components
    pub fn log_startup(&self) {
        info!(
            client = self.client.name(),
            tools = self.dispatcher.registry().len(),
            static_rules = self.cache.rules().len(),
            cache_backend = self.cache.backend_name().unwrap_or("none"),
            max_iterations = self.config.max_iterations,
            "Orchestrator ready"
        );
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Get the router
    #[must_use]
    pub fn router(&self) -> &ModelRouter {
        &self.router
    }

    /// Get the accountant
    #[must_use]
    pub fn accountant(&self) -> &Arc<UsageAccountant> {
        &self.accountant
    }

    /// Get the cache gate
    #[must_use]
    pub fn cache(&self) -> &Arc<CacheGate> {
        &self.cache
    }
}
