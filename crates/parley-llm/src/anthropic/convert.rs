use super::types::{AnthropicRequest, AnthropicResponse};
use crate::completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};

/// Borrow a completion request as the Messages API body
pub(crate) fn to_wire(
    request: &CompletionRequest,
    default_max_tokens: u32,
    stream: bool,
) -> AnthropicRequest<'_> {
    AnthropicRequest {
        model: &request.model,
        max_tokens: if request.max_tokens == 0 {
            default_max_tokens
        } else {
            request.max_tokens
        },
        system: request
            .system_prompt
            .as_deref()
            .filter(|s| !s.trim().is_empty()),
        messages: &request.messages,
        tools: &request.tools,
        stream,
    }
}

/// Convert a Messages API response, dropping block kinds the orchestrator does not use
pub(crate) fn from_wire(response: AnthropicResponse) -> CompletionResponse {
    CompletionResponse {
        content: response
            .content
            .into_iter()
            .filter_map(|block| block.into_segment())
            .collect(),
        usage: TokenUsage::new(response.usage.input_tokens, response.usage.output_tokens),
        stop_reason: response
            .stop_reason
            .as_deref()
            .map(StopReason::from_wire)
            .unwrap_or_default(),
        model: response.model,
    }
}
