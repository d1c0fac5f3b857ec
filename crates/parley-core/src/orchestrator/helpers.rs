//! Orchestrator helper methods
//!
//! Contains the steps shared by the synchronous and streaming entry points:
//! - Cache check and routing
//! - Usage accounting and cache population after the loop
//! - Transcript persistence

use crate::error::Error;
use parley_llm::{Role, RoutingContext, RoutingDecision, UsageRecord};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::config::ChatRequest;
use super::core::Orchestrator;
use super::types::{CacheType, ChatResponse, LoopOutcome};

impl Orchestrator {
    /// Answer from cache if possible
    ///
    /// Static rules are consulted unless the request skips the cache. The
    /// dynamic cache is only consulted for first-turn requests without tools,
    /// the same requests that are allowed to populate it.
    pub(crate) async fn check_cache(&self, request: &ChatRequest) -> Option<ChatResponse> {
        if request.options.skip_cache {
            return None;
        }

        if let Some(answer) = self.cache.lookup_static(&request.message) {
            debug!(tenant = %request.tenant_id, "Static rule hit");
            self.accountant.record(&UsageRecord::cache_hit());
            return Some(ChatResponse::cached(answer, "cache", CacheType::Static));
        }

        if !request.conversation_history.is_empty() || request.has_tools() {
            return None;
        }

        let entry = self
            .cache
            .lookup_dynamic(&request.tenant_id, &request.message)
            .await?;
        self.accountant.record(&UsageRecord::cache_hit());
        Some(ChatResponse::cached(entry.response, entry.model, CacheType::Dynamic))
    }

    /// Pick the model for the whole request
    pub(crate) fn route(&self, request: &ChatRequest) -> RoutingDecision {
        let mut context = RoutingContext::new()
            .with_conversation_length(request.conversation_history.len())
            .with_tenant(!request.tenant_id.is_empty())
            .with_tools(request.has_tools());
        if let Some(model) = &request.options.force_model {
            context = context.with_force_model(model.clone());
        }

        let decision = self.router.select(&request.message, &context);
        debug!(
            tier = %decision.tier,
            model = %decision.model,
            score = decision.score,
            reason = ?decision.reason,
            "Routed request"
        );
        decision
    }

    /// Record usage once for the finished request; returns `(cost, savings)`
    pub(crate) fn account(&self, decision: &RoutingDecision, outcome: &LoopOutcome) -> (f64, f64) {
        let usage = outcome.usage;
        self.accountant
            .record(&UsageRecord::billed(decision.tier, usage));
        (
            self.accountant
                .cost_of(decision.tier, usage.input_tokens, usage.output_tokens),
            self.accountant
                .savings_of(decision.tier, usage.input_tokens, usage.output_tokens),
        )
    }

    /// Start the cache write for an eligible answer
    ///
    /// The write runs in its own task so the caller never waits on the
    /// backend; `None` when the answer may not be cached.
    pub(crate) fn spawn_cache_write(
        &self,
        request: &ChatRequest,
        model: &str,
        content: &str,
    ) -> Option<JoinHandle<()>> {
        if request.options.skip_cache {
            return None;
        }
        if !self.cache.is_eligible(
            request.conversation_history.len(),
            request.has_tools(),
            content,
        ) {
            return None;
        }

        let cache = Arc::clone(&self.cache);
        let tenant_id = request.tenant_id.clone();
        let query = request.message.clone();
        let content = content.to_string();
        let model = model.to_string();
        Some(tokio::spawn(async move {
            cache.store(&tenant_id, &query, &content, &model).await;
        }))
    }

    /// Append a transcript line when the request names a conversation
    ///
    /// Failures and slow stores are logged; the request carries on.
    pub(crate) async fn persist(&self, request: &ChatRequest, role: Role, content: &str) {
        let (Some(store), Some(conversation_id)) = (&self.transcripts, &request.conversation_id)
        else {
            return;
        };

        let limit = self.config.transcript_timeout;
        let result = match timeout(limit, store.save(conversation_id, role, content)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Transcript(format!(
                "save timed out after {}ms",
                limit.as_millis()
            ))),
        };

        if let Err(e) = result {
            warn!(
                conversation_id = %conversation_id,
                error = %e,
                "Failed to save transcript"
            );
        }
    }
}
