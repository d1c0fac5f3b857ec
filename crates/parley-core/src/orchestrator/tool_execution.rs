//! Tool execution logic
//!
//! Fans one response's invocations out to the dispatcher and joins them
//! before the loop resumes.

use crate::error::{Error, Result};
use parley_llm::{ToolInvocation, ToolResult};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::config::ChatRequest;
use super::core::Orchestrator;
use super::stream::{disconnected, emit};
use super::types::{StreamEvent, ToolCallRecord};

impl Orchestrator {
    /// Execute every invocation of one response
    ///
    /// Returns one result per invocation, in invocation order. If the sink
    /// closes while tools run, the in-flight tasks are left to finish on
    /// their own and their results are discarded.
    pub(crate) async fn execute_tools(
        &self,
        invocations: &[ToolInvocation],
        request: &ChatRequest,
        iteration: usize,
        sink: Option<&mpsc::Sender<StreamEvent>>,
        records: &mut Vec<ToolCallRecord>,
    ) -> Result<Vec<ToolResult>> {
        info!(iteration, count = invocations.len(), "Dispatching tools");

        for invocation in invocations {
            emit(
                sink,
                StreamEvent::ToolStart {
                    tool: invocation.name.clone(),
                },
            )
            .await;
        }

        let calls = tokio::select! {
            calls = self.dispatcher.dispatch_all(invocations, &request.tenant_id) => calls,
            () = disconnected(sink) => {
                debug!(iteration, "Client disconnected during tool dispatch");
                return Err(Error::Cancelled);
            }
        };

        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            emit(
                sink,
                StreamEvent::ToolComplete {
                    tool: call.name.clone(),
                    success: call.result.success,
                },
            )
            .await;

            records.push(ToolCallRecord {
                tool: call.name,
                correlation_id: call.result.correlation_id.clone(),
                success: call.result.success,
                duration_ms: call.duration_ms,
                iteration,
            });
            results.push(call.result);
        }

        Ok(results)
    }
}
