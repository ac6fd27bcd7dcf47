// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resumer: the periodic loop that wakes paused executions once their
//! wake condition is satisfied (an approval decision, a fired timer, or a
//! matching event already written onto `resume_data` by the EventRouter).

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use wfe_adapters::{HttpSink, MessageBus, NotificationSink, RecordSink};
use wfe_core::{Clock, Execution, ExecutionStatus};
use wfe_storage::{ExecutionStore, StoreError, WorkflowStore};

use crate::error::EngineError;
use crate::hints::paused_step_hints;
use crate::interpreter::Interpreter;

/// A paused execution older than this with no wake decision gets a
/// warning on every tick, but is never auto-cancelled.
const STALE_PAUSE_WARNING_MS: u64 = 24 * 60 * 60 * 1000;

pub struct Resumer<N, R, H, C: Clock> {
    executions: Arc<dyn ExecutionStore>,
    workflows: Arc<dyn WorkflowStore>,
    interpreter: Arc<Interpreter<N, R, H, C>>,
    bus: Arc<dyn MessageBus>,
    clock: C,
    batch_size: usize,
}

impl<N, R, H, C> Resumer<N, R, H, C>
where
    N: NotificationSink + 'static,
    R: RecordSink + 'static,
    H: HttpSink + 'static,
    C: Clock + 'static,
{
    pub fn new(
        executions: Arc<dyn ExecutionStore>,
        workflows: Arc<dyn WorkflowStore>,
        interpreter: Arc<Interpreter<N, R, H, C>>,
        bus: Arc<dyn MessageBus>,
        clock: C,
        batch_size: usize,
    ) -> Self {
        Self { executions, workflows, interpreter, bus, clock, batch_size }
    }

    /// Spawn the periodic loop. Returns the task's join handle so a
    /// `Supervisor` can await it at shutdown.
    pub fn spawn(self: Arc<Self>, interval: Duration, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(err) = self.tick().await {
                            tracing::warn!(error = %err, "resumer tick failed");
                        }
                    }
                }
            }
        })
    }

    /// Process one batch of paused executions. Returns how many were
    /// resumed.
    pub async fn tick(&self) -> Result<usize, EngineError> {
        let paused = self.executions.paused_ready(self.batch_size)?;
        let mut resumed = 0;
        for execution in paused {
            self.warn_if_stale(&execution);
            match self.try_resume(execution).await {
                Ok(true) => resumed += 1,
                Ok(false) => {}
                Err(err) => tracing::warn!(error = %err, "resumer failed to process a paused execution"),
            }
        }
        Ok(resumed)
    }

    fn warn_if_stale(&self, execution: &Execution) {
        let Some(paused_at) = execution.paused_at_ms else { return };
        if self.clock.epoch_ms().saturating_sub(paused_at) > STALE_PAUSE_WARNING_MS {
            tracing::warn!(execution_id = %execution.id, paused_at_ms = paused_at, "execution has been paused for over 24h with no decision");
        }
    }

    async fn try_resume(&self, mut execution: Execution) -> Result<bool, EngineError> {
        let Some(resume_data) = self.wake_decision(&execution)? else { return Ok(false) };

        let workflow = self.workflows.get_by_id(execution.organization_id, execution.workflow_id)?;
        let org = execution.organization_id;
        let id = execution.id;
        execution.resume(resume_data, self.clock.epoch_ms());

        match self.executions.update(org, execution.clone(), Some(ExecutionStatus::Paused)) {
            Ok(()) => {}
            Err(StoreError::Conflict { .. }) => {
                tracing::warn!(execution_id = %id, "execution resumed by another replica first; skipping");
                return Ok(false);
            }
            Err(err) => return Err(err.into()),
        }

        let workflow_id = workflow.id;
        self.interpreter.run(execution, &workflow).await?;
        let _ = self
            .bus
            .publish(
                "executions",
                json!({
                    "type": "execution.resumed",
                    "execution_id": id,
                    "organization_id": org,
                    "workflow_id": workflow_id,
                    "status": "running",
                }),
            )
            .await;
        Ok(true)
    }

    /// `None` means "still waiting"; `Some(data)` is the `resume_data` to
    /// hand the execution on its way back to `running`.
    fn wake_decision(&self, execution: &Execution) -> Result<Option<Value>, EngineError> {
        if let Some(resume_data) = &execution.resume_data {
            match execution.paused_reason.as_deref() {
                // The EventRouter writes `resume_data = {"event": ...}` the
                // moment a matching event arrives; its mere presence is the
                // wake signal, there's no approved/denied decision to read.
                Some("wait_event") if resume_data.get("event").is_some() => {
                    return Ok(Some(resume_data.clone()));
                }
                _ => {
                    if resume_data.get("approved").and_then(Value::as_bool).is_some() {
                        return Ok(Some(resume_data.clone()));
                    }
                    tracing::warn!(execution_id = %execution.id, "paused execution has resume_data without a boolean 'approved' key; leaving paused");
                    return Ok(None);
                }
            }
        }

        let Some(step_id) = execution.paused_step_id.as_deref() else { return Ok(None) };
        let Some(hints) = paused_step_hints(&*self.executions, execution.organization_id, execution.id, step_id)? else {
            return Ok(None);
        };

        match execution.paused_reason.as_deref() {
            Some("wait_timer") => {
                let timeout_at = hints.get("timeout_at").and_then(Value::as_u64);
                if timeout_at.is_some_and(|t| self.clock.epoch_ms() >= t) {
                    Ok(Some(json!({})))
                } else {
                    Ok(None)
                }
            }
            // wait_event executions wake via `resume_data` written by the
            // EventRouter when a matching event arrives.
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "resumer_tests.rs"]
mod tests;
