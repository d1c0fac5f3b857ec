//! Orchestrator assembly
//!
//! Turns an [`AppConfig`] into a ready [`Orchestrator`]. The completion
//! client is built separately so tests can hand in a scripted one.

use super::config::{AppConfig, CacheBackendKind};
use anyhow::{Context, Result};
use parley_core::{
    CacheBackend, CacheGate, MemoryCacheBackend, Orchestrator, RedisCacheBackend, StaticRules,
    TranscriptStore,
};
use parley_llm::{
    AnthropicClient, AnthropicConfig, CompletionClient, ModelRouter, UsageAccountant,
};
use parley_tools::{CapabilityRegistry, DispatcherConfig, ToolDispatcher};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Build the Anthropic client from the configured key variable
pub fn connect(config: &AppConfig) -> Result<Arc<dyn CompletionClient>> {
    let llm = &config.llm;
    let client_config = AnthropicConfig::from_env_var(&llm.api_key_env)
        .with_context(|| format!("Set {} or run with a .env file", llm.api_key_env))?
        .with_base_url(llm.base_url.clone())
        .with_timeout(Duration::from_secs(llm.timeout_secs))
        .with_max_tokens(llm.default_max_tokens);

    let client = AnthropicClient::new(client_config).context("Failed to create Anthropic client")?;
    Ok(Arc::new(client))
}

/// Assemble the orchestrator around a completion client
pub fn build_orchestrator(
    config: &AppConfig,
    client: Arc<dyn CompletionClient>,
    registry: Arc<CapabilityRegistry>,
    transcripts: Option<Arc<dyn TranscriptStore>>,
) -> Result<Orchestrator> {
    let router = ModelRouter::new(config.router.clone()).context("Invalid router configuration")?;

    let dispatcher = ToolDispatcher::new(
        registry,
        DispatcherConfig::default()
            .with_timeout(Duration::from_secs(config.orchestrator.tool_timeout_secs)),
    );

    let rules = StaticRules::from_rules(&config.cache.static_rules);
    let backend: Arc<dyn CacheBackend> = match config.cache.backend {
        CacheBackendKind::Memory => {
            let memory = Arc::new(MemoryCacheBackend::new());
            // The sweep task needs a runtime; without one, reads and writes still expire entries
            if tokio::runtime::Handle::try_current().is_ok() {
                memory.spawn_purger(Duration::from_secs(config.cache.purge_interval_secs));
            }
            memory
        }
        CacheBackendKind::Redis => {
            let url = config
                .cache
                .redis_url
                .as_deref()
                .context("cache.redis_url is required for the redis backend")?;
            Arc::new(RedisCacheBackend::new(url).context("Failed to create Redis cache backend")?)
        }
    };
    let cache = CacheGate::new(rules, config.cache.policy()).with_backend(backend);

    let mut orchestrator = Orchestrator::new(
        client,
        Arc::new(router),
        config
            .orchestrator
            .engine_config(config.llm.default_max_tokens),
    )
    .with_dispatcher(dispatcher)
    .with_cache(Arc::new(cache))
    .with_accountant(Arc::new(UsageAccountant::new(config.pricing)));

    if let Some(store) = transcripts {
        orchestrator = orchestrator.with_transcripts(store);
    }

    info!(
        backend = ?config.cache.backend,
        static_rules = config.cache.static_rules.len(),
        "Orchestrator assembled"
    );
    orchestrator.log_startup();
    Ok(orchestrator)
}
