use super::convert::{from_wire, to_wire};
use super::provider::{status_error, AnthropicClient};
use super::security::sanitize_api_error;
use super::stream::StreamAccumulator;
use super::types::{AnthropicConfig, AnthropicResponse};
use crate::completion::{CompletionRequest, StopReason};
use crate::error::Error;
use crate::message::{Segment, Turn};
use crate::tools::{ToolResult, ToolSchema};
use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration;

#[test]
fn test_config_builder() {
    let config = AnthropicConfig::new("test-key")
        .with_base_url("http://localhost:9999")
        .with_max_tokens(2048)
        .with_timeout(Duration::from_secs(10));

    assert_eq!(config.api_key, "test-key");
    assert_eq!(config.base_url, "http://localhost:9999");
    assert_eq!(config.default_max_tokens, 2048);
    assert_eq!(config.timeout, Duration::from_secs(10));
}

#[test]
fn test_config_debug_masks_key() {
    let config = AnthropicConfig::new("sk-ant-REDACTED");
    let debug_str = format!("{:?}", config);

    assert!(!debug_str.contains("1234567890"));
    assert!(debug_str.contains("sk-a...ghij"));
}

#[test]
fn test_missing_env_key_is_not_configured() {
    let err = AnthropicConfig::from_env_var("PARLEY_TEST_UNSET_KEY_VAR").unwrap_err();
    assert!(matches!(err, Error::NotConfigured(_)));
}

#[test]
fn test_empty_key_rejected() {
    let result = AnthropicClient::new(AnthropicConfig::new("  "));
    assert!(matches!(result, Err(Error::NotConfigured(_))));
}

#[test]
fn test_request_wire_shape() {
    let request = CompletionRequest::new("claude-haiku-4-5", 0)
        .with_system_prompt("Be brief")
        .with_message(Turn::user("What's the price?"));

    let body = serde_json::to_value(to_wire(&request, 1024, false)).unwrap();
    assert_eq!(body["model"], "claude-haiku-4-5");
    assert_eq!(body["max_tokens"], 1024);
    assert_eq!(body["system"], "Be brief");
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"], "What's the price?");
    assert!(body.get("tools").is_none());
    assert!(body.get("stream").is_none());
}

#[test]
fn test_request_with_tools_and_results() {
    let request = CompletionRequest::new("claude-sonnet-4-5", 512)
        .with_message(Turn::user("Book me in"))
        .with_message(Turn::assistant_segments(vec![Segment::tool_use(
            "toolu_1",
            "check_availability",
            json!({"date": "tomorrow"}),
        )]))
        .with_message(Turn::tool_results(&[ToolResult::success(
            "toolu_1",
            json!({"slots": ["10:00"]}),
        )]))
        .with_tools(vec![ToolSchema::new(
            "check_availability",
            "Check open slots",
            json!({"type": "object"}),
        )]);

    let body = serde_json::to_value(to_wire(&request, 1024, true)).unwrap();
    assert_eq!(body["max_tokens"], 512);
    assert_eq!(body["stream"], true);
    assert_eq!(body["tools"][0]["name"], "check_availability");
    assert_eq!(body["messages"][1]["content"][0]["type"], "tool_use");
    assert_eq!(body["messages"][2]["content"][0]["type"], "tool_result");
    assert_eq!(body["messages"][2]["content"][0]["tool_use_id"], "toolu_1");
}

#[test]
fn test_response_conversion() {
    let raw = json!({
        "id": "msg_1",
        "type": "message",
        "role": "assistant",
        "model": "claude-sonnet-4-5",
        "content": [
            {"type": "thinking", "thinking": "hmm", "signature": "x"},
            {"type": "text", "text": "Let me check."},
            {"type": "tool_use", "id": "toolu_9", "name": "lookup", "input": {"q": 1}}
        ],
        "stop_reason": "tool_use",
        "usage": {"input_tokens": 120, "output_tokens": 40}
    });

    let parsed: AnthropicResponse = serde_json::from_value(raw).unwrap();
    let response = from_wire(parsed);

    assert_eq!(response.content.len(), 2);
    assert_eq!(response.text(), "Let me check.");
    assert_eq!(response.stop_reason, StopReason::ToolUse);
    assert_eq!(response.usage.input_tokens, 120);
    assert_eq!(response.usage.output_tokens, 40);
    assert_eq!(response.tool_invocations()[0].correlation_id, "toolu_9");
}

#[test]
fn test_status_error_mapping() {
    assert!(matches!(
        status_error(StatusCode::TOO_MANY_REQUESTS, "{}"),
        Error::RateLimit
    ));

    let err = status_error(
        StatusCode::SERVICE_UNAVAILABLE,
        r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#,
    );
    assert!(matches!(err, Error::Server { status: 503, .. }));
    assert!(err.is_transient());

    let err = status_error(
        StatusCode::UNAUTHORIZED,
        r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#,
    );
    match err {
        Error::Api(message) => assert!(!message.contains("x-api-key")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_sanitize_api_error() {
    let sanitized = sanitize_api_error("Invalid x-api-key header");
    assert!(!sanitized.contains("x-api-key"));
    assert!(sanitized.contains("authentication"));

    let sanitized = sanitize_api_error("overloaded: too many requests");
    assert!(sanitized.contains("rate limit"));

    let long = "x".repeat(400);
    assert!(sanitize_api_error(&long).ends_with("...(truncated)"));
}

fn feed(acc: &mut StreamAccumulator, events: &[(&str, serde_json::Value)]) -> Vec<String> {
    let mut deltas = Vec::new();
    for (event, data) in events {
        if let Some(text) = acc.apply(event, &data.to_string()).unwrap() {
            deltas.push(text);
        }
    }
    deltas
}

#[test]
fn test_stream_text_and_tool_use() {
    let mut acc = StreamAccumulator::new();
    let deltas = feed(
        &mut acc,
        &[
            (
                "message_start",
                json!({"type": "message_start", "message": {"model": "claude-haiku-4-5", "usage": {"input_tokens": 25, "output_tokens": 1}}}),
            ),
            (
                "content_block_start",
                json!({"type": "content_block_start", "index": 0, "content_block": {"type": "text", "text": ""}}),
            ),
            ("ping", json!({"type": "ping"})),
            (
                "content_block_delta",
                json!({"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": "Let me "}}),
            ),
            (
                "content_block_delta",
                json!({"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": "check."}}),
            ),
            ("content_block_stop", json!({"type": "content_block_stop", "index": 0})),
            (
                "content_block_start",
                json!({"type": "content_block_start", "index": 1, "content_block": {"type": "tool_use", "id": "toolu_1", "name": "check_availability", "input": {}}}),
            ),
            (
                "content_block_delta",
                json!({"type": "content_block_delta", "index": 1, "delta": {"type": "input_json_delta", "partial_json": "{\"date\": "}}),
            ),
            (
                "content_block_delta",
                json!({"type": "content_block_delta", "index": 1, "delta": {"type": "input_json_delta", "partial_json": "\"tomorrow\"}"}}),
            ),
            ("content_block_stop", json!({"type": "content_block_stop", "index": 1})),
            (
                "message_delta",
                json!({"type": "message_delta", "delta": {"stop_reason": "tool_use"}, "usage": {"output_tokens": 42}}),
            ),
            ("message_stop", json!({"type": "message_stop"})),
        ],
    );

    assert_eq!(deltas, vec!["Let me ", "check."]);
    assert!(acc.is_finished());

    let response = acc.finish().unwrap();
    assert_eq!(response.model, "claude-haiku-4-5");
    assert_eq!(response.text(), "Let me check.");
    assert_eq!(response.stop_reason, StopReason::ToolUse);
    assert_eq!(response.usage.input_tokens, 25);
    assert_eq!(response.usage.output_tokens, 42);

    let calls = response.tool_invocations();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].correlation_id, "toolu_1");
    assert_eq!(calls[0].input, json!({"date": "tomorrow"}));
}

#[test]
fn test_stream_error_event() {
    let mut acc = StreamAccumulator::new();
    let err = acc
        .apply(
            "error",
            r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#,
        )
        .unwrap_err();
    assert!(matches!(err, Error::Stream(_)));
}

#[test]
fn test_stream_truncated_before_stop() {
    let mut acc = StreamAccumulator::new();
    feed(
        &mut acc,
        &[(
            "message_start",
            json!({"type": "message_start", "message": {"model": "m", "usage": {"input_tokens": 1, "output_tokens": 0}}}),
        )],
    );
    assert!(matches!(acc.finish(), Err(Error::Stream(_))));
}

#[test]
fn test_stream_malformed_tool_json() {
    let mut acc = StreamAccumulator::new();
    feed(
        &mut acc,
        &[
            (
                "content_block_start",
                json!({"index": 0, "content_block": {"type": "tool_use", "id": "t", "name": "x", "input": {}}}),
            ),
            (
                "content_block_delta",
                json!({"index": 0, "delta": {"type": "input_json_delta", "partial_json": "{\"broken"}}),
            ),
            ("message_stop", json!({})),
        ],
    );
    assert!(matches!(acc.finish(), Err(Error::InvalidResponse(_))));
}
