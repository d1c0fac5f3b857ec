//! Main execution loop
//!
//! Contains the synchronous entry point and the bounded model/tool loop
//! shared with streaming.

use crate::error::{Error, Result};
use parley_llm::{
    CompletionRequest, CompletionResponse, Role, RoutingDecision, TokenUsage, Turn,
};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

use super::config::ChatRequest;
use super::core::Orchestrator;
use super::stream::disconnected;
use super::types::{ChatResponse, LoopOutcome, StreamEvent, STOP_MAX_ITERATIONS};

impl Orchestrator {
    /// Handle a chat request and return the complete answer
    ///
    /// # Errors
    ///
    /// Returns an error when a completion call fails or times out. Tool
    /// failures do not fail the request; the model sees them as failed tool
    /// results.
    #[instrument(skip(self, request), fields(tenant = %request.tenant_id))]
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        info!(history = request.conversation_history.len(), "Processing chat request");
        self.persist(&request, Role::User, &request.message).await;

        if let Some(cached) = self.check_cache(&request).await {
            self.persist(&request, Role::Assistant, &cached.content).await;
            return Ok(cached);
        }

        let decision = self.route(&request);
        let outcome = match self.run_loop(&request, &decision, None).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, kind = ?e.kind(), "Chat request failed");
                return Err(e);
            }
        };

        let content = outcome.content();
        let (cost, savings) = self.account(&decision, &outcome);
        self.spawn_cache_write(&request, &decision.model, &content);
        self.persist(&request, Role::Assistant, &content).await;

        info!(
            tier = %decision.tier,
            iterations = outcome.iterations,
            input_tokens = outcome.usage.input_tokens,
            output_tokens = outcome.usage.output_tokens,
            cost,
            "Chat request completed"
        );

        Ok(ChatResponse {
            content,
            model: decision.model,
            from_cache: false,
            cache_type: None,
            tier: Some(decision.tier),
            usage: outcome.usage,
            cost,
            savings,
            stop_reason: outcome.stop_reason,
            iterations: outcome.iterations,
            tool_calls: outcome.tool_calls,
        })
    }

    /// Call the model until it stops asking for tools or the cap is reached
    ///
    /// With a sink, text is streamed as it arrives and tool progress is
    /// reported; a closed sink ends the loop with [`Error::Cancelled`].
    #[instrument(skip_all, fields(tier = %decision.tier, model = %decision.model))]
    pub(crate) async fn run_loop(
        &self,
        request: &ChatRequest,
        decision: &RoutingDecision,
        sink: Option<&mpsc::Sender<StreamEvent>>,
    ) -> Result<LoopOutcome> {
        let tools = request.tools().to_vec();
        let max_tokens = request
            .options
            .max_tokens
            .unwrap_or(self.config.default_max_tokens);
        let max_iterations = self.config.max_iterations.max(1);

        let mut messages = request.conversation_history.clone();
        messages.push(Turn::user(request.message.clone()));

        let mut outcome = LoopOutcome {
            texts: Vec::new(),
            usage: TokenUsage::default(),
            stop_reason: String::new(),
            iterations: 0,
            tool_calls: Vec::new(),
        };

        loop {
            if sink.is_some_and(|tx| tx.is_closed()) {
                return Err(Error::Cancelled);
            }

            outcome.iterations += 1;
            let iteration = outcome.iterations;

            let mut completion = CompletionRequest::new(decision.model.clone(), max_tokens)
                .with_messages(messages.clone())
                .with_tools(tools.clone());
            if let Some(prompt) = &self.config.system_prompt {
                completion = completion.with_system_prompt(prompt.clone());
            }

            debug!(iteration, turns = messages.len(), "Calling model");
            let separate = !outcome.texts.is_empty();
            let response = tokio::select! {
                result = self.call_model(completion, sink, separate) => result?,
                () = disconnected(sink) => return Err(Error::Cancelled),
            };

            outcome.usage.accumulate(response.usage);
            let text = response.text();
            if !text.is_empty() {
                outcome.texts.push(text);
            }

            let invocations = response.tool_invocations();
            if invocations.is_empty() {
                outcome.stop_reason = response.stop_reason.as_str().to_string();
                return Ok(outcome);
            }

            if iteration >= max_iterations {
                warn!(
                    iteration,
                    pending_tools = invocations.len(),
                    "Iteration limit reached, returning accumulated text"
                );
                outcome.stop_reason = STOP_MAX_ITERATIONS.to_string();
                return Ok(outcome);
            }

            messages.push(Turn::assistant_segments(response.content));
            let results = self
                .execute_tools(&invocations, request, iteration, sink, &mut outcome.tool_calls)
                .await?;
            messages.push(Turn::tool_results(&results));
        }
    }

    /// One completion call under the model timeout
    ///
    /// `separate` marks that earlier iterations already produced text.
    async fn call_model(
        &self,
        request: CompletionRequest,
        sink: Option<&mpsc::Sender<StreamEvent>>,
        separate: bool,
    ) -> Result<CompletionResponse> {
        let call = async {
            match sink {
                Some(tx) => self.stream_completion(request, tx, separate).await,
                None => self.client.complete(request).await,
            }
        };

        match timeout(self.config.model_timeout, call).await {
            Ok(result) => result.map_err(Error::from),
            Err(_) => {
                let ms = u64::try_from(self.config.model_timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(timeout_ms = ms, "Completion call timed out");
                Err(Error::Llm(parley_llm::Error::Timeout(ms)))
            }
        }
    }
}
