use super::convert::{from_wire, to_wire};
use super::security::sanitize_api_error;
use super::stream::StreamAccumulator;
use super::types::{AnthropicConfig, AnthropicError, AnthropicRequest, AnthropicResponse, API_VERSION};
use crate::completion::{CompletionRequest, CompletionResponse};
use crate::error::{Error, Result};
use crate::provider::CompletionClient;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::{Client, Response, StatusCode};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

/// Anthropic Messages API client
pub struct AnthropicClient {
    pub(crate) client: Client,
    pub(crate) config: AnthropicConfig,
}

impl AnthropicClient {
    /// Create a new client
    pub fn new(config: AnthropicConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::NotConfigured("Anthropic API key is empty".to_string()));
        }

        // Whole-request timeouts are applied per call; streams use an idle timeout instead.
        let client = Client::builder()
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(AnthropicConfig::from_env()?)
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.config.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    fn map_transport(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(self.timeout_ms())
        } else {
            Error::Network(e.to_string())
        }
    }

    /// POST the request; non-2xx statuses are turned into errors
    async fn send(&self, body: &AnthropicRequest<'_>, streaming: bool) -> Result<Response> {
        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));

        debug!(url = %url, streaming, "Sending request to Anthropic");

        let mut builder = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(body);
        if !streaming {
            builder = builder.timeout(self.config.timeout);
        }

        let response = builder.send().await.map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.map_err(|e| self.map_transport(e))?;
        Err(status_error(status, &text))
    }
}

/// Map a non-success status and body to an error
pub(crate) fn status_error(status: StatusCode, body: &str) -> Error {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Error::RateLimit;
    }

    // SECURITY: never expose the raw body
    let message = match serde_json::from_str::<AnthropicError>(body) {
        Ok(error) => sanitize_api_error(&format!("{}: {}", error.error.r#type, error.error.message)),
        Err(_) => sanitize_api_error(&format!("HTTP {status}")),
    };

    if status.is_server_error() {
        Error::Server {
            status: status.as_u16(),
            message,
        }
    } else {
        Error::Api(message)
    }
}

#[async_trait::async_trait]
impl CompletionClient for AnthropicClient {
    fn name(&self) -> &str {
        "anthropic"
    }

    #[instrument(skip(self, request), fields(model = %request.model, tools = request.tools.len()))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = to_wire(&request, self.config.default_max_tokens, false);
        let response = self.send(&body, false).await?;

        let text = response.text().await.map_err(|e| self.map_transport(e))?;
        let parsed: AnthropicResponse =
            serde_json::from_str(&text).map_err(|e| Error::InvalidResponse(e.to_string()))?;

        Ok(from_wire(parsed))
    }

    #[instrument(skip(self, request, deltas), fields(model = %request.model, tools = request.tools.len()))]
    async fn stream(
        &self,
        request: CompletionRequest,
        deltas: mpsc::UnboundedSender<String>,
    ) -> Result<CompletionResponse> {
        let body = to_wire(&request, self.config.default_max_tokens, true);
        let response = self.send(&body, true).await?;

        let mut events = response.bytes_stream().eventsource();
        let mut acc = StreamAccumulator::new();
        let idle = self.config.timeout;

        while !acc.is_finished() {
            let event = match timeout(idle, events.next()).await {
                Ok(Some(Ok(event))) => event,
                Ok(Some(Err(e))) => {
                    warn!(error = %e, "SSE transport error");
                    return Err(Error::Stream(e.to_string()));
                }
                Ok(None) => break,
                Err(_) => return Err(Error::Timeout(self.timeout_ms())),
            };

            if let Some(text) = acc.apply(&event.event, &event.data)? {
                let _ = deltas.send(text);
            }
        }

        acc.finish()
    }
}
