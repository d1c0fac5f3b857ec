//! Parley Tools - Capability registry and tool dispatcher
//!
//! This crate provides the tool half of Parley:
//! - Registry: capabilities registered once at startup, looked up by name
//! - Dispatcher: executes tool invocations with timeouts and panic isolation,
//!   always producing exactly one result per invocation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod dispatcher;
pub mod error;
pub mod registry;

pub use dispatcher::{DispatchedCall, DispatcherConfig, ToolDispatcher};
pub use error::{Error, Result};
pub use registry::{Capability, CapabilityRegistry, ToolOutcome};
