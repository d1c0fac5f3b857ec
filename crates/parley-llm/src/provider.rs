//! Completion client trait definition
//!
//! This module defines the seam between the orchestrator and the remote
//! completion service. Clients are constructed explicitly and injected.

use crate::completion::{CompletionRequest, CompletionResponse};
use crate::error::Result;
use tokio::sync::mpsc;

/// Trait for completion clients
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// Get the client name
    fn name(&self) -> &str;

    /// Run one completion call
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Run one completion call, forwarding text deltas as they arrive.
    ///
    /// Returns the fully assembled response once the stream ends. A closed
    /// receiver does not abort the call.
    async fn stream(
        &self,
        request: CompletionRequest,
        deltas: mpsc::UnboundedSender<String>,
    ) -> Result<CompletionResponse> {
        let response = self.complete(request).await?;
        let text = response.text();
        if !text.is_empty() {
            let _ = deltas.send(text);
        }
        Ok(response)
    }
}
