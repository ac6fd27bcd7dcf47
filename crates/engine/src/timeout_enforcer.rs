// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TimeoutEnforcer: the periodic loop that fails executions whose
//! absolute deadline has passed while still running or paused.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use wfe_adapters::MessageBus;
use wfe_core::Clock;
use wfe_storage::ExecutionStore;

use crate::error::EngineError;

pub struct TimeoutEnforcer<C: Clock> {
    executions: Arc<dyn ExecutionStore>,
    bus: Arc<dyn MessageBus>,
    clock: C,
    batch_size: usize,
}

impl<C: Clock + 'static> TimeoutEnforcer<C> {
    pub fn new(executions: Arc<dyn ExecutionStore>, bus: Arc<dyn MessageBus>, clock: C, batch_size: usize) -> Self {
        Self { executions, bus, clock, batch_size }
    }

    pub fn spawn(self: Arc<Self>, interval: Duration, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(err) = self.tick().await {
                            tracing::warn!(error = %err, "timeout enforcer tick failed");
                        }
                    }
                }
            }
        })
    }

    /// Fail one batch of timed-out executions. Returns how many were
    /// failed.
    pub async fn tick(&self) -> Result<usize, EngineError> {
        let now_ms = self.clock.epoch_ms();
        let due = self.executions.timed_out(now_ms, self.batch_size)?;
        let mut failed = 0;
        for mut execution in due {
            let org = execution.organization_id;
            let id = execution.id;
            let workflow_id = execution.workflow_id;
            let duration_s = execution.timeout_duration_s.unwrap_or(0);
            execution.fail(format!("execution timed out after {duration_s}s"), now_ms);

            // No conditional expected-status check: a timeout always wins
            // over whatever non-terminal state the execution was in.
            self.executions.update(org, execution, None)?;
            let _ = self
                .bus
                .publish(
                    "executions",
                    json!({
                        "type": "execution.failed",
                        "execution_id": id,
                        "organization_id": org,
                        "workflow_id": workflow_id,
                        "status": "failed",
                    }),
                )
                .await;
            failed += 1;
        }
        Ok(failed)
    }
}

#[cfg(test)]
#[path = "timeout_enforcer_tests.rs"]
mod tests;
