//! Orchestrator configuration
//!
//! Contains configuration types for the orchestrator:
//! - `OrchestratorConfig` for loop settings
//! - `ChatRequest` / `ChatOptions` for the inbound request

use parley_llm::{ToolSchema, Turn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-request options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatOptions {
    /// Tier name or model id that bypasses routing
    pub force_model: Option<String>,
    /// Skip cache lookups and writes
    pub skip_cache: bool,
    /// Output token limit per completion call
    pub max_tokens: Option<u32>,
}

/// Inbound chat request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Tenant the request belongs to
    pub tenant_id: String,
    /// The new user message
    pub message: String,
    /// Prior turns, oldest first
    #[serde(default)]
    pub conversation_history: Vec<Turn>,
    /// Tools the model may call
    #[serde(default)]
    pub available_tools: Option<Vec<ToolSchema>>,
    /// Options
    #[serde(default)]
    pub options: ChatOptions,
    /// Conversation to append the transcript to
    #[serde(default)]
    pub conversation_id: Option<String>,
}

impl ChatRequest {
    /// Create a new request
    #[must_use]
    pub fn new(tenant_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            message: message.into(),
            conversation_history: Vec::new(),
            available_tools: None,
            options: ChatOptions::default(),
            conversation_id: None,
        }
    }

    /// Set prior turns
    #[must_use]
    pub fn with_history(mut self, history: Vec<Turn>) -> Self {
        self.conversation_history = history;
        self
    }

    /// Offer tools to the model
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolSchema>) -> Self {
        self.available_tools = Some(tools);
        self
    }

    /// Set options
    #[must_use]
    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    /// Force a tier or model
    #[must_use]
    pub fn with_force_model(mut self, model: impl Into<String>) -> Self {
        self.options.force_model = Some(model.into());
        self
    }

    /// Skip the cache for this request
    #[must_use]
    pub fn with_skip_cache(mut self, skip: bool) -> Self {
        self.options.skip_cache = skip;
        self
    }

    /// Set the per-call output token limit
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.options.max_tokens = Some(max_tokens);
        self
    }

    /// Persist the transcript under this conversation
    #[must_use]
    pub fn with_conversation_id(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }

    /// Tools offered to the model (empty when none)
    #[must_use]
    pub fn tools(&self) -> &[ToolSchema] {
        self.available_tools.as_deref().unwrap_or_default()
    }

    /// Check if any tools are offered
    #[must_use]
    pub fn has_tools(&self) -> bool {
        !self.tools().is_empty()
    }
}

/// Configuration for the orchestrator
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum completion calls per request
    pub max_iterations: usize,
    /// Timeout for each completion call
    pub model_timeout: Duration,
    /// Output token limit when the request does not set one
    pub default_max_tokens: u32,
    /// System prompt sent with every call
    pub system_prompt: Option<String>,
    /// Buffer size of the stream event channel
    pub stream_buffer: usize,
    /// Upper bound on one transcript save
    pub transcript_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            model_timeout: Duration::from_secs(30),
            default_max_tokens: 1024,
            system_prompt: None,
            stream_buffer: 64,
            transcript_timeout: Duration::from_secs(2),
        }
    }
}

impl OrchestratorConfig {
    /// Create a new configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations (at least one)
    #[must_use]
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    /// Set the completion call timeout
    #[must_use]
    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = timeout;
        self
    }

    /// Set the default output token limit
    #[must_use]
    pub fn with_default_max_tokens(mut self, max_tokens: u32) -> Self {
        self.default_max_tokens = max_tokens;
        self
    }

    /// Set the system prompt
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set the transcript save timeout
    #[must_use]
    pub fn with_transcript_timeout(mut self, timeout: Duration) -> Self {
        self.transcript_timeout = timeout;
        self
    }
}
