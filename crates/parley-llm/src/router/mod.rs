//! Router - complexity scoring and model tier selection
//!
//! The router scores each incoming message with cheap textual and contextual
//! heuristics and maps the score onto a model tier through two thresholds.
//! Below the low threshold the economy tier answers; everything else goes to
//! the premium tier, so uncertain requests lean toward capability.
//!
//! # Module Structure
//!
//! - `types`: tiers, routing context and decisions
//! - `config`: router configuration (tier models, thresholds, vocabularies)
//! - `scoring`: the complexity heuristics
//! - `router_impl`: `ModelRouter` with runtime-adjustable thresholds

mod config;
mod router_impl;
mod scoring;
mod types;

#[cfg(test)]
mod tests;

pub use config::RouterConfig;
pub use router_impl::ModelRouter;
pub use scoring::ComplexityScorer;
pub use types::{ModelTier, RoutingContext, RoutingDecision, RoutingReason, Thresholds};
