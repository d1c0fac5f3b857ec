//! Application wiring
//!
//! # Module Structure
//!
//! - `config`: configuration types and validation
//! - `loader`: layered configuration loading
//! - `compose`: orchestrator assembly

pub mod compose;
pub mod config;
pub mod loader;

pub use compose::{build_orchestrator, connect};
pub use config::AppConfig;
pub use loader::load_config;
