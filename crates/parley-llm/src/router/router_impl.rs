//! Model router implementation

use super::config::RouterConfig;
use super::scoring::ComplexityScorer;
use super::types::{ModelTier, RoutingContext, RoutingDecision, RoutingReason, Thresholds};
use crate::error::Result;
use std::sync::RwLock;
use tracing::{debug, info};

/// Selects a model tier per request
///
/// Scoring is pure; the thresholds are the only mutable state and are read
/// once per call, so a decision never mixes old and new thresholds.
pub struct ModelRouter {
    config: RouterConfig,
    scorer: ComplexityScorer,
    thresholds: RwLock<Thresholds>,
}

impl ModelRouter {
    /// Create a router from configuration
    pub fn new(config: RouterConfig) -> Result<Self> {
        let scorer = ComplexityScorer::new(&config)?;
        let thresholds = config.thresholds.shifted(0);
        Ok(Self {
            config,
            scorer,
            thresholds: RwLock::new(thresholds),
        })
    }

    /// Router configuration
    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Current thresholds
    #[must_use]
    pub fn thresholds(&self) -> Thresholds {
        *self.thresholds.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Shift both thresholds by a signed delta and return the new values.
    ///
    /// Positive values route more traffic to the economy tier.
    pub fn adjust_thresholds(&self, delta: i32) -> Thresholds {
        let mut guard = self.thresholds.write().unwrap_or_else(|e| e.into_inner());
        let updated = guard.shifted(delta);
        info!(
            delta,
            low = updated.low,
            high = updated.high,
            "Routing thresholds adjusted"
        );
        *guard = updated;
        updated
    }

    /// Complexity score of a message in context
    #[must_use]
    pub fn score(&self, message: &str, context: &RoutingContext) -> i32 {
        self.scorer.score(message, context)
    }

    /// Select a tier and model for a request
    #[must_use]
    pub fn select(&self, message: &str, context: &RoutingContext) -> RoutingDecision {
        if let Some(forced) = context.force_model.as_deref().filter(|m| !m.trim().is_empty()) {
            return self.forced(forced);
        }

        let score = self.scorer.score(message, context);
        let thresholds = self.thresholds();
        let (tier, reason) = thresholds.classify(score);

        debug!(
            score,
            low = thresholds.low,
            high = thresholds.high,
            tier = %tier,
            reason = %reason,
            "Routing decision"
        );

        RoutingDecision {
            tier,
            model: self.config.model_for(tier).to_string(),
            reason,
            score,
        }
    }

    fn forced(&self, forced: &str) -> RoutingDecision {
        let (tier, model) = match forced.parse::<ModelTier>() {
            Ok(tier) => (tier, self.config.model_for(tier).to_string()),
            // unknown model ids are billed at the premium rate
            Err(_) => (
                self.config.tier_of(forced).unwrap_or(ModelTier::Premium),
                forced.to_string(),
            ),
        };

        debug!(tier = %tier, model = %model, "Routing forced");

        RoutingDecision {
            tier,
            model,
            reason: RoutingReason::Forced,
            score: 0,
        }
    }
}
