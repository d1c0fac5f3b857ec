//! Message types for LLM conversations
//!
//! A conversation is an ordered list of [`Turn`]s. Turn content is either plain
//! text or a list of [`Segment`]s; the serialized shape matches the
//! completion service's `messages` array so turns go over the wire unchanged.

use crate::tools::{ToolInvocation, ToolResult};
use serde::{Deserialize, Serialize};

/// Role of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User turn (also carries tool results)
    User,
    /// Assistant turn (may carry tool invocations)
    Assistant,
}

impl Role {
    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One content segment of a turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    /// Plain text
    Text {
        /// Text content
        text: String,
    },
    /// Tool invocation requested by the model
    ToolUse {
        /// Correlation ID
        id: String,
        /// Tool name
        name: String,
        /// Tool input
        input: serde_json::Value,
    },
    /// Result of a tool invocation
    ToolResult {
        /// Correlation ID of the originating invocation
        tool_use_id: String,
        /// Serialized payload
        content: String,
        /// Set when the tool failed
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        is_error: bool,
    },
}

impl Segment {
    /// Create a text segment
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create a tool-use segment
    #[must_use]
    pub fn tool_use(
        id: impl Into<String>,
        name: impl Into<String>,
        input: serde_json::Value,
    ) -> Self {
        Self::ToolUse {
            id: id.into(),
            name: name.into(),
            input,
        }
    }
}

impl From<&ToolResult> for Segment {
    fn from(result: &ToolResult) -> Self {
        Self::ToolResult {
            tool_use_id: result.correlation_id.clone(),
            content: result.payload.to_string(),
            is_error: !result.success,
        }
    }
}

impl From<&ToolInvocation> for Segment {
    fn from(invocation: &ToolInvocation) -> Self {
        Self::ToolUse {
            id: invocation.correlation_id.clone(),
            name: invocation.name.clone(),
            input: invocation.input.clone(),
        }
    }
}

/// Turn content: plain text or a list of segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TurnContent {
    /// Plain text
    Text(String),
    /// Structured segments
    Segments(Vec<Segment>),
}

impl TurnContent {
    /// Concatenated text of all text segments
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Segments(segments) => segments
                .iter()
                .filter_map(|s| match s {
                    Segment::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
        }
    }
}

/// A single conversation turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Role of the sender
    pub role: Role,
    /// Turn content
    pub content: TurnContent,
}

impl Turn {
    /// Create a plain-text user turn
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: TurnContent::Text(content.into()),
        }
    }

    /// Create a plain-text assistant turn
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: TurnContent::Text(content.into()),
        }
    }

    /// Create an assistant turn from response segments
    #[must_use]
    pub fn assistant_segments(segments: Vec<Segment>) -> Self {
        Self {
            role: Role::Assistant,
            content: TurnContent::Segments(segments),
        }
    }

    /// Create the user turn carrying tool results, preserving their order
    #[must_use]
    pub fn tool_results(results: &[ToolResult]) -> Self {
        Self {
            role: Role::User,
            content: TurnContent::Segments(results.iter().map(Segment::from).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_turn_creation() {
        let user = Turn::user("Hello!");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content.text(), "Hello!");

        let assistant = Turn::assistant("Hi there!");
        assert_eq!(assistant.role, Role::Assistant);
    }

    #[test]
    fn test_segment_wire_shape() {
        let segment = Segment::tool_use("toolu_1", "check_availability", json!({"date": "2026-03-01"}));
        let value = serde_json::to_value(&segment).unwrap();
        assert_eq!(value["type"], "tool_use");
        assert_eq!(value["id"], "toolu_1");
        assert_eq!(value["input"]["date"], "2026-03-01");

        let text = serde_json::to_value(Segment::text("hi")).unwrap();
        assert_eq!(text, json!({"type": "text", "text": "hi"}));
    }

    #[test]
    fn test_tool_results_turn() {
        let results = vec![
            ToolResult::success("toolu_1", json!({"slots": 3})),
            ToolResult::failure("toolu_2", json!({"error": "boom"})),
        ];
        let turn = Turn::tool_results(&results);
        assert_eq!(turn.role, Role::User);

        let value = serde_json::to_value(&turn).unwrap();
        let blocks = value["content"].as_array().unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0]["tool_use_id"], "toolu_1");
        assert!(blocks[0].get("is_error").is_none());
        assert_eq!(blocks[1]["tool_use_id"], "toolu_2");
        assert_eq!(blocks[1]["is_error"], true);
    }

    #[test]
    fn test_plain_turn_deserializes_from_string_content() {
        let turn: Turn = serde_json::from_str(r#"{"role":"user","content":"hello"}"#).unwrap();
        assert_eq!(turn.content, TurnContent::Text("hello".to_string()));
    }

    #[test]
    fn test_segment_text_concatenation() {
        let content = TurnContent::Segments(vec![
            Segment::text("Let me check. "),
            Segment::tool_use("t1", "lookup", json!({})),
            Segment::text("Done."),
        ]);
        assert_eq!(content.text(), "Let me check. Done.");
    }
}
