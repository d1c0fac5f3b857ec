//! Streaming entry point
//!
//! The loop runs in its own task and reports through a bounded channel.
//! Dropping the receiver cancels the request before its next completion
//! call.

use crate::error::Error;
use parley_llm::{CompletionRequest, CompletionResponse, Role};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

use super::config::ChatRequest;
use super::core::Orchestrator;
use super::types::StreamEvent;

/// Send an event if there is a sink; a gone receiver is noticed by the loop
pub(super) async fn emit(sink: Option<&mpsc::Sender<StreamEvent>>, event: StreamEvent) {
    if let Some(tx) = sink {
        let _ = tx.send(event).await;
    }
}

/// Resolves once the receiver is dropped; never without a sink
pub(super) async fn disconnected(sink: Option<&mpsc::Sender<StreamEvent>>) {
    match sink {
        Some(tx) => tx.closed().await,
        None => std::future::pending().await,
    }
}

impl Orchestrator {
    /// Handle a chat request, streaming events as they are produced
    ///
    /// The stream always ends with exactly one [`StreamEvent::Done`] or
    /// [`StreamEvent::Error`], unless the receiver is dropped first.
    pub fn chat_stream(self: &Arc<Self>, request: ChatRequest) -> mpsc::Receiver<StreamEvent> {
        let (tx, rx) = mpsc::channel(self.config.stream_buffer.max(1));
        let this = Arc::clone(self);
        tokio::spawn(async move {
            this.run_stream(request, tx).await;
        });
        rx
    }

    #[instrument(skip(self, request, tx), fields(tenant = %request.tenant_id))]
    async fn run_stream(&self, request: ChatRequest, tx: mpsc::Sender<StreamEvent>) {
        info!(history = request.conversation_history.len(), "Processing streaming chat request");
        self.persist(&request, Role::User, &request.message).await;

        if let Some(cached) = self.check_cache(&request).await {
            emit(
                Some(&tx),
                StreamEvent::Text {
                    content: cached.content.clone(),
                },
            )
            .await;
            emit(
                Some(&tx),
                StreamEvent::Done {
                    stop_reason: cached.stop_reason,
                },
            )
            .await;
            self.persist(&request, Role::Assistant, &cached.content).await;
            return;
        }

        let decision = self.route(&request);
        match self.run_loop(&request, &decision, Some(&tx)).await {
            Ok(outcome) => {
                let content = outcome.content();
                let (cost, _) = self.account(&decision, &outcome);
                emit(
                    Some(&tx),
                    StreamEvent::Done {
                        stop_reason: outcome.stop_reason.clone(),
                    },
                )
                .await;

                // After `done`; the client already has its answer. Waiting here
                // only holds the channel open until the entry is written.
                if let Some(write) = self.spawn_cache_write(&request, &decision.model, &content) {
                    let _ = write.await;
                }
                self.persist(&request, Role::Assistant, &content).await;

                info!(
                    tier = %decision.tier,
                    iterations = outcome.iterations,
                    cost,
                    "Streaming chat request completed"
                );
            }
            Err(Error::Cancelled) => {
                info!("Client disconnected, request abandoned");
            }
            Err(e) => {
                error!(error = %e, kind = ?e.kind(), "Streaming chat request failed");
                emit(
                    Some(&tx),
                    StreamEvent::Error {
                        message: e.user_message(),
                    },
                )
                .await;
            }
        }
    }

    /// Stream one completion call, forwarding text deltas to the sink
    ///
    /// With `separate`, the first delta is preceded by a blank line so the
    /// streamed text reads the same as the joined synchronous answer.
    pub(super) async fn stream_completion(
        &self,
        request: CompletionRequest,
        tx: &mpsc::Sender<StreamEvent>,
        separate: bool,
    ) -> parley_llm::Result<CompletionResponse> {
        let (delta_tx, mut delta_rx) = mpsc::unbounded_channel::<String>();

        let forward = async {
            let mut needs_separator = separate;
            while let Some(mut content) = delta_rx.recv().await {
                if content.is_empty() {
                    continue;
                }
                if needs_separator {
                    needs_separator = false;
                    content.insert_str(0, "\n\n");
                }
                if tx.send(StreamEvent::Text { content }).await.is_err() {
                    break;
                }
            }
        };

        let (result, ()) = tokio::join!(self.client.stream(request, delta_tx), forward);
        result
    }
}
