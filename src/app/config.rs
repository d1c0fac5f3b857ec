//! Application configuration types
//!
//! Every section deserializes with defaults so a partial override file is
//! enough; `config/default.toml` documents the full shape.

use anyhow::{bail, Result};
use parley_core::{CachePolicy, OrchestratorConfig, StaticRule};
use parley_llm::{PriceTable, RouterConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorAppConfig,
    #[serde(default)]
    pub pricing: PriceTable,
}

impl AppConfig {
    /// Reject settings that cannot produce a working orchestrator
    pub fn validate(&self) -> Result<()> {
        if self.orchestrator.max_iterations == 0 {
            bail!("orchestrator.max_iterations must be at least 1");
        }
        if self.cache.backend == CacheBackendKind::Redis
            && self
                .cache
                .redis_url
                .as_deref()
                .map_or(true, |url| url.trim().is_empty())
        {
            bail!("cache.backend = \"redis\" requires cache.redis_url");
        }
        let thresholds = self.router.thresholds;
        if thresholds.low > thresholds.high {
            bail!(
                "router.thresholds.low ({}) must not exceed router.thresholds.high ({})",
                thresholds.low,
                thresholds.high
            );
        }
        if self.llm.api_key_env.trim().is_empty() {
            bail!("llm.api_key_env must name an environment variable");
        }
        Ok(())
    }
}

/// Completion service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_llm_timeout_secs(),
            default_max_tokens: default_max_tokens(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

fn default_llm_timeout_secs() -> u64 {
    30
}

fn default_max_tokens() -> u32 {
    1024
}

/// Where dynamic cache entries live
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    #[default]
    Memory,
    Redis,
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_max_response_chars")]
    pub max_response_chars: usize,
    #[serde(default = "default_backend_timeout_ms")]
    pub backend_timeout_ms: u64,
    /// Sweep interval for expired in-memory entries
    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u64,
    #[serde(default)]
    pub backend: CacheBackendKind,
    #[serde(default)]
    pub redis_url: Option<String>,
    #[serde(default)]
    pub static_rules: Vec<StaticRule>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: default_cache_ttl_secs(),
            max_response_chars: default_max_response_chars(),
            backend_timeout_ms: default_backend_timeout_ms(),
            purge_interval_secs: default_purge_interval_secs(),
            backend: CacheBackendKind::default(),
            redis_url: None,
            static_rules: Vec::new(),
        }
    }
}

impl CacheConfig {
    /// Gate policy built from these settings
    pub fn policy(&self) -> CachePolicy {
        let policy = CachePolicy::default()
            .with_ttl(Duration::from_secs(self.ttl_secs))
            .with_max_response_chars(self.max_response_chars)
            .with_backend_timeout(Duration::from_millis(self.backend_timeout_ms));
        CachePolicy {
            enabled: self.enabled,
            ..policy
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_max_response_chars() -> usize {
    500
}

fn default_backend_timeout_ms() -> u64 {
    2000
}

fn default_purge_interval_secs() -> u64 {
    60
}

/// Orchestrator configuration (exposed to TOML)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorAppConfig {
    /// Maximum model calls per request (tool-calling loop)
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_model_timeout_secs")]
    pub model_timeout_secs: u64,
    /// Per-call tool timeout
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default = "default_stream_buffer")]
    pub stream_buffer: usize,
    /// Upper bound on one transcript save
    #[serde(default = "default_transcript_timeout_ms")]
    pub transcript_timeout_ms: u64,
}

impl Default for OrchestratorAppConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            model_timeout_secs: default_model_timeout_secs(),
            tool_timeout_secs: default_tool_timeout_secs(),
            system_prompt: None,
            stream_buffer: default_stream_buffer(),
            transcript_timeout_ms: default_transcript_timeout_ms(),
        }
    }
}

impl OrchestratorAppConfig {
    /// Engine configuration built from these settings
    pub fn engine_config(&self, default_max_tokens: u32) -> OrchestratorConfig {
        let mut config = OrchestratorConfig::new()
            .with_max_iterations(self.max_iterations)
            .with_model_timeout(Duration::from_secs(self.model_timeout_secs))
            .with_default_max_tokens(default_max_tokens)
            .with_transcript_timeout(Duration::from_millis(self.transcript_timeout_ms));
        if let Some(prompt) = self.system_prompt.as_deref().filter(|p| !p.trim().is_empty()) {
            config = config.with_system_prompt(prompt);
        }
        config.stream_buffer = self.stream_buffer;
        config
    }
}

fn default_max_iterations() -> usize {
    5
}

fn default_model_timeout_secs() -> u64 {
    30
}

fn default_tool_timeout_secs() -> u64 {
    15
}

fn default_stream_buffer() -> usize {
    64
}

fn default_transcript_timeout_ms() -> u64 {
    2000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.orchestrator.max_iterations, 5);
        assert_eq!(config.cache.backend, CacheBackendKind::Memory);
        assert_eq!(config.llm.api_key_env, "ANTHROPIC_API_KEY");
    }

    #[test]
    fn test_validate_rejects_zero_iterations() {
        let mut config = AppConfig::default();
        config.orchestrator.max_iterations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_redis_without_url() {
        let mut config = AppConfig::default();
        config.cache.backend = CacheBackendKind::Redis;
        assert!(config.validate().is_err());

        config.cache.redis_url = Some("redis://127.0.0.1:6379".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let mut config = AppConfig::default();
        config.router.thresholds.low = 8;
        config.router.thresholds.high = 2;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("router.thresholds.low"));
    }

    #[test]
    fn test_cache_policy_follows_settings() {
        let cache = CacheConfig {
            enabled: false,
            ttl_secs: 60,
            max_response_chars: 120,
            backend_timeout_ms: 250,
            ..CacheConfig::default()
        };
        let policy = cache.policy();

        assert!(!policy.enabled);
        assert_eq!(policy.ttl, Duration::from_secs(60));
        assert_eq!(policy.max_response_chars, 120);
        assert_eq!(policy.backend_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_engine_config_ignores_blank_prompt() {
        let settings = OrchestratorAppConfig {
            system_prompt: Some("   ".to_string()),
            ..OrchestratorAppConfig::default()
        };
        let engine = settings.engine_config(512);

        assert!(engine.system_prompt.is_none());
        assert_eq!(engine.default_max_tokens, 512);
        assert_eq!(engine.max_iterations, 5);
        assert_eq!(engine.transcript_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_engine_config_applies_transcript_timeout() {
        let settings = OrchestratorAppConfig {
            transcript_timeout_ms: 150,
            ..OrchestratorAppConfig::default()
        };
        let engine = settings.engine_config(512);

        assert_eq!(engine.transcript_timeout, Duration::from_millis(150));
    }
}
