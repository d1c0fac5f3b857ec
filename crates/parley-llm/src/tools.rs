//! Tool types for LLM function calling
//!
//! This module defines the schema advertised to the model, the invocation the
//! model emits and the result fed back to it.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tool schema advertised to the completion service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON schema for the input
    pub input_schema: serde_json::Value,
}

impl ToolSchema {
    /// Create a new tool schema
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Correlation ID (`id` of the `tool_use` segment)
    pub correlation_id: String,
    /// Tool name
    pub name: String,
    /// Input arguments
    pub input: serde_json::Value,
}

impl ToolInvocation {
    /// Create a new invocation
    #[must_use]
    pub fn new(
        correlation_id: impl Into<String>,
        name: impl Into<String>,
        input: serde_json::Value,
    ) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            name: name.into(),
            input,
        }
    }

    /// Parse input as a typed value
    pub fn parse_input<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.input.clone()).map_err(|e| Error::InvalidResponse(e.to_string()))
    }
}

/// Result of one tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Correlation ID of the originating invocation
    pub correlation_id: String,
    /// Whether the tool succeeded
    pub success: bool,
    /// JSON payload handed back to the model
    pub payload: serde_json::Value,
}

impl ToolResult {
    /// Create a successful result
    #[must_use]
    pub fn success(correlation_id: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            success: true,
            payload,
        }
    }

    /// Create a failed result
    #[must_use]
    pub fn failure(correlation_id: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            success: false,
            payload,
        }
    }

    /// Create a failed result carrying an error message
    #[must_use]
    pub fn error(correlation_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::failure(
            correlation_id,
            serde_json::json!({ "success": false, "error": message.into() }),
        )
    }
}
