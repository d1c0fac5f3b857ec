//! Completion request and response types
//!
//! This module defines the types exchanged with the completion service.

use crate::message::{Segment, Turn};
use crate::tools::{ToolInvocation, ToolSchema};
use serde::{Deserialize, Serialize};

/// Token usage information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Input (prompt) tokens
    pub input_tokens: u32,
    /// Output (completion) tokens
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Create a usage value
    #[must_use]
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Add another usage value in place
    pub fn accumulate(&mut self, other: TokenUsage) {
        self.input_tokens = self.input_tokens.saturating_add(other.input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(other.output_tokens);
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of turn
    #[default]
    EndTurn,
    /// Model requested tool use
    ToolUse,
    /// Output token limit reached
    MaxTokens,
    /// A stop sequence matched
    StopSequence,
    /// Any value this client does not know
    Unknown,
}

impl StopReason {
    /// Parse a wire value, mapping unrecognized values to [`StopReason::Unknown`]
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value {
            "end_turn" => Self::EndTurn,
            "tool_use" => Self::ToolUse,
            "max_tokens" => Self::MaxTokens,
            "stop_sequence" => Self::StopSequence,
            _ => Self::Unknown,
        }
    }

    /// Wire name of the stop reason
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EndTurn => "end_turn",
            Self::ToolUse => "tool_use",
            Self::MaxTokens => "max_tokens",
            Self::StopSequence => "stop_sequence",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completion request
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// System prompt
    pub system_prompt: Option<String>,
    /// Conversation turns
    pub messages: Vec<Turn>,
    /// Tools the model may invoke
    pub tools: Vec<ToolSchema>,
}

impl CompletionRequest {
    /// Create a new completion request
    #[must_use]
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            ..Default::default()
        }
    }

    /// Set the system prompt
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Add a turn
    #[must_use]
    pub fn with_message(mut self, turn: Turn) -> Self {
        self.messages.push(turn);
        self
    }

    /// Add turns
    #[must_use]
    pub fn with_messages(mut self, turns: Vec<Turn>) -> Self {
        self.messages.extend(turns);
        self
    }

    /// Set the available tools
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolSchema>) -> Self {
        self.tools = tools;
        self
    }
}

/// Completion response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Ordered content segments (text and tool use)
    pub content: Vec<Segment>,
    /// Token usage
    pub usage: TokenUsage,
    /// Stop reason
    pub stop_reason: StopReason,
    /// Model that produced the response
    pub model: String,
}

impl CompletionResponse {
    /// Create a text-only response
    #[must_use]
    pub fn text_only(model: impl Into<String>, text: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            content: vec![Segment::text(text)],
            usage,
            stop_reason: StopReason::EndTurn,
            model: model.into(),
        }
    }

    /// Concatenated text of all text segments
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|s| match s {
                Segment::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Tool invocations in response order
    #[must_use]
    pub fn tool_invocations(&self) -> Vec<ToolInvocation> {
        self.content
            .iter()
            .filter_map(|s| match s {
                Segment::ToolUse { id, name, input } => {
                    Some(ToolInvocation::new(id.clone(), name.clone(), input.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Check if the response requests tool use
    #[must_use]
    pub fn has_tool_invocations(&self) -> bool {
        self.content
            .iter()
            .any(|s| matches!(s, Segment::ToolUse { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_completion_request_builder() {
        let request = CompletionRequest::new("claude-haiku-4-5", 512)
            .with_system_prompt("You are helpful")
            .with_message(Turn::user("Hello"))
            .with_tools(vec![ToolSchema::new("lookup", "Lookup", json!({}))]);

        assert_eq!(request.model, "claude-haiku-4-5");
        assert_eq!(request.max_tokens, 512);
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.tools.len(), 1);
        assert_eq!(request.system_prompt.as_deref(), Some("You are helpful"));
    }

    #[test]
    fn test_response_tool_invocations_preserve_order() {
        let response = CompletionResponse {
            content: vec![
                Segment::text("Checking both."),
                Segment::tool_use("toolu_a", "first", json!({"n": 1})),
                Segment::tool_use("toolu_b", "second", json!({"n": 2})),
            ],
            usage: TokenUsage::new(10, 5),
            stop_reason: StopReason::ToolUse,
            model: "m".to_string(),
        };

        assert!(response.has_tool_invocations());
        let calls = response.tool_invocations();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].correlation_id, "toolu_a");
        assert_eq!(calls[1].name, "second");
        assert_eq!(response.text(), "Checking both.");
    }

    #[test]
    fn test_unknown_stop_reason() {
        assert_eq!(StopReason::from_wire("pause_turn"), StopReason::Unknown);
        assert_eq!(StopReason::from_wire("tool_use"), StopReason::ToolUse);
        assert_eq!(StopReason::MaxTokens.to_string(), "max_tokens");
    }

    #[test]
    fn test_usage_accumulate() {
        let mut total = TokenUsage::default();
        total.accumulate(TokenUsage::new(100, 20));
        total.accumulate(TokenUsage::new(150, 30));
        assert_eq!(total, TokenUsage::new(250, 50));
    }
}
