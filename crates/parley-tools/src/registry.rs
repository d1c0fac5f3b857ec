//! Registry - capability registration and lookup
//!
//! Capabilities are the external business actions the model may invoke
//! (availability checks, bookings, lookups). The registry is built once at
//! startup and shared read-only afterwards.

use crate::error::Result;
use parley_llm::ToolSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// What a capability returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// Whether the action succeeded
    pub success: bool,
    /// JSON payload handed back to the model
    pub payload: serde_json::Value,
}

impl ToolOutcome {
    /// Create a successful outcome
    #[must_use]
    pub fn success(payload: serde_json::Value) -> Self {
        Self {
            success: true,
            payload,
        }
    }

    /// Create a failed outcome
    #[must_use]
    pub fn failure(payload: serde_json::Value) -> Self {
        Self {
            success: false,
            payload,
        }
    }
}

/// Trait for capability implementations
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Capability: Send + Sync {
    /// Schema advertised to the model
    fn schema(&self) -> &ToolSchema;

    /// Run the capability for a tenant
    ///
    /// Implementations validate their own input and report bad input as
    /// [`Error::InvalidInput`](crate::Error::InvalidInput).
    async fn invoke(&self, input: serde_json::Value, tenant_id: &str) -> Result<ToolOutcome>;
}

/// Registry for managing capabilities
#[derive(Default)]
pub struct CapabilityRegistry {
    capabilities: HashMap<String, Arc<dyn Capability>>,
}

impl CapabilityRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability under its schema name, replacing any previous one
    pub fn register(&mut self, capability: Arc<dyn Capability>) {
        let name = capability.schema().name.clone();
        if self.capabilities.contains_key(&name) {
            warn!(tool = %name, "Replacing registered capability");
        } else {
            debug!(tool = %name, "Registering capability");
        }
        self.capabilities.insert(name, capability);
    }

    /// Get a capability by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Capability>> {
        self.capabilities.get(name).cloned()
    }

    /// Check if a capability exists
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.capabilities.contains_key(name)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.capabilities.keys().cloned().collect();
        names.sort();
        names
    }

    /// Schemas of every capability, sorted by name
    #[must_use]
    pub fn schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self
            .capabilities
            .values()
            .map(|c| c.schema().clone())
            .collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Get capability count
    #[must_use]
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}
