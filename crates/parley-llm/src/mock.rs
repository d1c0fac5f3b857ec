//! Mock completion client for testing
//!
//! Returns queued responses in order, then falls back to a repeating default.
//! Every request is recorded so tests can assert on what the model was sent.

use crate::completion::{CompletionRequest, CompletionResponse, TokenUsage};
use crate::error::Result;
use crate::provider::CompletionClient;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// A scripted completion client
pub struct MockCompletionClient {
    responses: Arc<Mutex<VecDeque<Result<CompletionResponse>>>>,
    default_response: CompletionResponse,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCompletionClient {
    /// Create a mock that answers "mock response" once queued responses run out
    #[must_use]
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            default_response: CompletionResponse::text_only(
                "mock-model",
                "mock response",
                TokenUsage::default(),
            ),
            requests: Arc::new(Mutex::new(Vec::new())),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Replace the response returned when the queue is empty
    #[must_use]
    pub fn with_default_response(mut self, response: CompletionResponse) -> Self {
        self.default_response = response;
        self
    }

    /// Sleep before answering each call
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a successful response
    pub fn push_response(&self, response: CompletionResponse) {
        self.push_result(Ok(response));
    }

    /// Queue a result (success or error)
    pub fn push_result(&self, result: Result<CompletionResponse>) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(result);
    }

    /// Number of completion calls made so far
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, in call order
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    async fn next(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let queued = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        queued.unwrap_or_else(|| Ok(self.default_response.clone()))
    }
}

#[async_trait::async_trait]
impl CompletionClient for MockCompletionClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.next(request).await
    }

    async fn stream(
        &self,
        request: CompletionRequest,
        deltas: mpsc::UnboundedSender<String>,
    ) -> Result<CompletionResponse> {
        let response = self.next(request).await?;
        // word-sized chunks, like a real stream
        for chunk in response.text().split_inclusive(' ') {
            let _ = deltas.send(chunk.to_string());
        }
        Ok(response)
    }
}
