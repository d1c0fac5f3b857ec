//! Dispatcher - tool invocation execution
//!
//! This module resolves invocations to registered capabilities and runs them:
//! - Every invocation yields exactly one [`ToolResult`] with its correlation id
//! - Unknown names, capability errors, panics and timeouts become failed results
//! - Batches run concurrently and come back in invocation order
//!
//! There is no automatic retry.

use crate::error::Error;
use crate::registry::{CapabilityRegistry, ToolOutcome};
use futures::future::join_all;
use parley_llm::{ToolInvocation, ToolResult};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, error, instrument, warn};

/// Configuration for the dispatcher
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Per-call timeout
    pub call_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(15),
        }
    }
}

impl DispatcherConfig {
    /// Set the per-call timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}

/// One executed invocation with its metadata
#[derive(Debug, Clone)]
pub struct DispatchedCall {
    /// Tool name
    pub name: String,
    /// Result handed back to the model
    pub result: ToolResult,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

/// Executes tool invocations against the capability registry
#[derive(Clone)]
pub struct ToolDispatcher {
    registry: Arc<CapabilityRegistry>,
    config: DispatcherConfig,
}

impl ToolDispatcher {
    /// Create a new dispatcher
    #[must_use]
    pub fn new(registry: Arc<CapabilityRegistry>, config: DispatcherConfig) -> Self {
        Self { registry, config }
    }

    /// Create with default configuration
    #[must_use]
    pub fn with_defaults(registry: Arc<CapabilityRegistry>) -> Self {
        Self::new(registry, DispatcherConfig::default())
    }

    /// Get the registry
    #[must_use]
    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Execute one invocation; never fails
    pub async fn execute(&self, invocation: &ToolInvocation, tenant_id: &str) -> ToolResult {
        self.dispatch(invocation, tenant_id).await.result
    }

    /// Execute a batch concurrently; results keep invocation order
    pub async fn execute_all(
        &self,
        invocations: &[ToolInvocation],
        tenant_id: &str,
    ) -> Vec<ToolResult> {
        self.dispatch_all(invocations, tenant_id)
            .await
            .into_iter()
            .map(|call| call.result)
            .collect()
    }

    /// Like [`execute_all`](Self::execute_all) but keeps name and timing
    #[instrument(skip(self, invocations), fields(count = invocations.len()))]
    pub async fn dispatch_all(
        &self,
        invocations: &[ToolInvocation],
        tenant_id: &str,
    ) -> Vec<DispatchedCall> {
        join_all(
            invocations
                .iter()
                .map(|invocation| self.dispatch(invocation, tenant_id)),
        )
        .await
    }

    /// Like [`execute`](Self::execute) but keeps name and timing
    #[instrument(skip(self, invocation), fields(tool = %invocation.name, id = %invocation.correlation_id))]
    pub async fn dispatch(&self, invocation: &ToolInvocation, tenant_id: &str) -> DispatchedCall {
        let start = Instant::now();
        let result = self.run(invocation, tenant_id).await;
        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        debug!(
            tool = %invocation.name,
            success = result.success,
            duration_ms,
            "Tool dispatch completed"
        );

        DispatchedCall {
            name: invocation.name.clone(),
            result,
            duration_ms,
        }
    }

    async fn run(&self, invocation: &ToolInvocation, tenant_id: &str) -> ToolResult {
        let id = invocation.correlation_id.clone();

        let Some(capability) = self.registry.get(&invocation.name) else {
            warn!(tool = %invocation.name, "Unknown tool requested");
            return ToolResult::failure(
                id,
                json!({
                    "success": false,
                    "error": "not implemented",
                    "available": self.registry.names(),
                }),
            );
        };

        // A panicking capability only takes down its own task.
        let input = invocation.input.clone();
        let tenant = tenant_id.to_string();
        let mut handle =
            tokio::spawn(async move { capability.invoke(input, &tenant).await });

        match timeout(self.config.call_timeout, &mut handle).await {
            Ok(Ok(Ok(ToolOutcome { success, payload }))) => ToolResult {
                correlation_id: id,
                success,
                payload,
            },
            Ok(Ok(Err(e))) => {
                error!(tool = %invocation.name, error = %e, "Tool execution failed");
                ToolResult::error(id, e.to_string())
            }
            Ok(Err(join_err)) => {
                error!(tool = %invocation.name, error = %join_err, "Tool task aborted");
                ToolResult::error(id, "tool execution panicked")
            }
            Err(_) => {
                handle.abort();
                let timeout_ms =
                    u64::try_from(self.config.call_timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(tool = %invocation.name, timeout_ms, "Tool execution timed out");
                ToolResult::error(id, Error::Timeout(timeout_ms).to_string())
            }
        }
    }
}
