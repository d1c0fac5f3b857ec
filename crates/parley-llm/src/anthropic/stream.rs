//! SSE event accumulation
//!
//! [`StreamAccumulator`] consumes Messages API stream events one at a time,
//! returns the text deltas to forward and assembles the final response. It
//! holds no I/O so the event handling is testable without a server.

use super::security::sanitize_api_error;
use super::types::{
    AnthropicError, BlockDelta, ContentBlockDeltaEvent, ContentBlockStartEvent, MessageDeltaEvent,
    MessageStartEvent, ResponseContentBlock,
};
use crate::completion::{CompletionResponse, StopReason, TokenUsage};
use crate::error::{Error, Result};
use crate::message::Segment;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

#[derive(Debug)]
enum Block {
    Text(String),
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
        partial_json: String,
    },
    Ignored,
}

/// Accumulates one streamed completion
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    model: String,
    usage: TokenUsage,
    stop_reason: Option<StopReason>,
    blocks: Vec<Block>,
    finished: bool,
}

impl StreamAccumulator {
    /// Create an empty accumulator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `message_stop` has been seen
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Apply one event; returns the text delta to forward, if any.
    ///
    /// An `error` event ends the stream with [`Error::Stream`].
    pub fn apply(&mut self, event: &str, data: &str) -> Result<Option<String>> {
        trace!(event, "Anthropic SSE event");
        match event {
            "message_start" => {
                let start: MessageStartEvent = parse(event, data)?;
                self.model = start.message.model;
                self.usage = TokenUsage::new(
                    start.message.usage.input_tokens,
                    start.message.usage.output_tokens,
                );
            }
            "content_block_start" => {
                let start: ContentBlockStartEvent = parse(event, data)?;
                let block = match start.content_block {
                    ResponseContentBlock::Text { text } => Block::Text(text),
                    ResponseContentBlock::ToolUse { id, name, input } => Block::ToolUse {
                        id,
                        name,
                        input,
                        partial_json: String::new(),
                    },
                    ResponseContentBlock::Other => Block::Ignored,
                };
                if start.index >= self.blocks.len() {
                    self.blocks.resize_with(start.index + 1, || Block::Ignored);
                }
                self.blocks[start.index] = block;
            }
            "content_block_delta" => {
                let delta: ContentBlockDeltaEvent = parse(event, data)?;
                match (self.blocks.get_mut(delta.index), delta.delta) {
                    (Some(Block::Text(buf)), BlockDelta::TextDelta { text }) => {
                        buf.push_str(&text);
                        return Ok(Some(text));
                    }
                    (
                        Some(Block::ToolUse { partial_json, .. }),
                        BlockDelta::InputJsonDelta {
                            partial_json: chunk,
                        },
                    ) => {
                        partial_json.push_str(&chunk);
                    }
                    (_, BlockDelta::Other) => {}
                    _ => {
                        debug!(index = delta.index, "Delta does not match its content block");
                    }
                }
            }
            "message_delta" => {
                let delta: MessageDeltaEvent = parse(event, data)?;
                if let Some(reason) = delta.delta.stop_reason.as_deref() {
                    self.stop_reason = Some(StopReason::from_wire(reason));
                }
                if let Some(usage) = delta.usage {
                    if let Some(input) = usage.input_tokens.filter(|n| *n > 0) {
                        self.usage.input_tokens = input;
                    }
                    if let Some(output) = usage.output_tokens {
                        self.usage.output_tokens = output;
                    }
                }
            }
            "message_stop" => {
                self.finished = true;
            }
            "error" => {
                let message = match serde_json::from_str::<AnthropicError>(data) {
                    Ok(err) => format!("{}: {}", err.error.r#type, err.error.message),
                    Err(_) => "stream error event".to_string(),
                };
                return Err(Error::Stream(sanitize_api_error(&message)));
            }
            // ping, content_block_stop and future event kinds
            _ => {}
        }
        Ok(None)
    }

    /// Assemble the final response; fails if the stream ended early
    pub fn finish(self) -> Result<CompletionResponse> {
        if !self.finished {
            return Err(Error::Stream(
                "stream closed before response completed".to_string(),
            ));
        }

        let mut content = Vec::with_capacity(self.blocks.len());
        for block in self.blocks {
            match block {
                Block::Text(text) if !text.is_empty() => content.push(Segment::Text { text }),
                Block::ToolUse {
                    id,
                    name,
                    input,
                    partial_json,
                } => {
                    let input = if partial_json.trim().is_empty() {
                        input
                    } else {
                        serde_json::from_str(&partial_json).map_err(|e| {
                            Error::InvalidResponse(format!("tool input for {name}: {e}"))
                        })?
                    };
                    content.push(Segment::ToolUse { id, name, input });
                }
                _ => {}
            }
        }

        Ok(CompletionResponse {
            content,
            usage: self.usage,
            stop_reason: self.stop_reason.unwrap_or_default(),
            model: self.model,
        })
    }
}

fn parse<T: DeserializeOwned>(event: &str, data: &str) -> Result<T> {
    serde_json::from_str(data).map_err(|e| Error::InvalidResponse(format!("{event}: {e}")))
}
