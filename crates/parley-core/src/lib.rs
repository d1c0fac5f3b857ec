//! Parley Core - Request orchestration engine
//!
//! This crate ties the completion client, router, tool dispatcher and
//! accountant together:
//! - Cache: static rule answers and a tenant-scoped TTL cache with pluggable
//!   backends (in-memory, Redis)
//! - Orchestrator: the bounded model/tool loop, synchronous and streaming
//! - Transcript: persistence seam for conversation turns
//! - Fallback: cancellable delayed tasks keyed by name

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod fallback;
pub mod orchestrator;
pub mod transcript;

pub use cache::{
    normalize_query, CacheBackend, CacheEntry, CacheGate, CachePolicy, MemoryCacheBackend,
    RedisCacheBackend, StaticRule, StaticRules,
};
pub use error::{Error, ErrorKind, Result};
pub use fallback::FallbackScheduler;
pub use orchestrator::{
    CacheType, ChatOptions, ChatRequest, ChatResponse, Orchestrator, OrchestratorConfig,
    StreamEvent, ToolCallRecord,
};
pub use transcript::{MemoryTranscriptStore, TranscriptLine, TranscriptStore};
