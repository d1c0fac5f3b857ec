//! Orchestrator - Main execution loop
//!
//! This module answers chat requests. A request passes through the cache
//! gate, is routed to a model tier once, then runs a bounded loop that lets
//! the model call tools and resumes it with their results.
//!
//! # Module Structure
//!
//! - `types`: Response and stream event types (ChatResponse, StreamEvent, etc.)
//! - `config`: Configuration types (OrchestratorConfig, ChatRequest)
//! - `core`: Orchestrator struct and builder methods
//! - `process`: Synchronous entry point and the loop itself
//! - `stream`: Streaming entry point
//! - `tool_execution`: Tool fan-out and fan-in
//! - `helpers`: Cache check, routing, accounting, transcripts

mod config;
mod core;
mod helpers;
mod process;
mod stream;
mod tool_execution;
mod types;


// Re-export public types
pub use config::{ChatOptions, ChatRequest, OrchestratorConfig};
pub use core::Orchestrator;
pub use types::{
    CacheType, ChatResponse, StreamEvent, ToolCallRecord, STOP_CACHE_HIT, STOP_MAX_ITERATIONS,
};
