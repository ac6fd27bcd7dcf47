// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! EventRouter: the ingress for trigger events. Matches an event against
//! enabled workflows and starts one execution per match, and wakes any
//! already-paused execution waiting on this event type.

use std::sync::Arc;

use serde_json::{json, Value};
use wfe_adapters::{HttpSink, MessageBus, NotificationSink, RecordSink};
use wfe_core::{Clock, Event, ExecutionId, ExecutionStatus};
use wfe_storage::{EventStore, ExecutionStore, WorkflowStore};

use crate::context::ContextBuilder;
use crate::error::EngineError;
use crate::hints::paused_step_hints;
use crate::interpreter::Interpreter;
use crate::launcher::ExecutionLauncher;

pub struct EventRouter<N, R, H, C: Clock> {
    events: Arc<dyn EventStore>,
    workflows: Arc<dyn WorkflowStore>,
    executions: Arc<dyn ExecutionStore>,
    launcher: ExecutionLauncher<N, R, H, C>,
}

impl<N, R, H, C> EventRouter<N, R, H, C>
where
    N: NotificationSink,
    R: RecordSink,
    H: HttpSink,
    C: Clock,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        events: Arc<dyn EventStore>,
        workflows: Arc<dyn WorkflowStore>,
        executions: Arc<dyn ExecutionStore>,
        context: ContextBuilder<C>,
        interpreter: Arc<Interpreter<N, R, H, C>>,
        bus: Arc<dyn MessageBus>,
        clock: C,
    ) -> Self {
        let launcher = ExecutionLauncher::new(executions.clone(), context, interpreter, bus, clock);
        Self { events, workflows, executions, launcher }
    }

    /// Persist `event`, start one execution per enabled workflow bound to
    /// its `event_type`, wake any paused execution waiting on this event
    /// type, and mark the event processed. Per-execution failures are
    /// logged and skipped; they never stop sibling workflows from starting.
    pub async fn ingest(&self, mut event: Event) -> Result<Vec<ExecutionId>, EngineError> {
        self.events.put(event.clone())?;

        let workflows = self.workflows.enabled_by_event_type(event.organization_id, &event.event_type)?;
        let mut triggered = Vec::with_capacity(workflows.len());
        for workflow in &workflows {
            let execution_key = format!("{}-{}", workflow.workflow_key, event.id);
            let result = self
                .launcher
                .launch(workflow, execution_key, event.event_type.clone(), event.payload.clone(), &event.payload)
                .await;
            match result {
                Ok(id) => triggered.push(id),
                Err(err) => {
                    tracing::warn!(workflow_id = %workflow.id, event_id = %event.id, error = %err, "workflow failed to start for event");
                }
            }
        }

        self.wake_waiting_executions(&event)?;

        event.mark_processed(triggered.clone(), self.events_clock_ms());
        self.events.put(event)?;
        Ok(triggered)
    }

    /// Paused executions blocked on `wait_event` for this event's type get
    /// their `resume_data` written directly; the Resumer picks them up on
    /// its next tick.
    fn wake_waiting_executions(&self, event: &Event) -> Result<(), EngineError> {
        for execution in self.executions.paused_ready(usize::MAX)? {
            if execution.organization_id != event.organization_id {
                continue;
            }
            if execution.paused_reason.as_deref() != Some("wait_event") {
                continue;
            }
            let Some(step_id) = execution.paused_step_id.as_deref() else { continue };
            let Some(hints) = paused_step_hints(&*self.executions, execution.organization_id, execution.id, step_id)? else {
                continue;
            };
            if hints.get("event_type").and_then(Value::as_str) != Some(event.event_type.as_str()) {
                continue;
            }

            let org = execution.organization_id;
            let id = execution.id;
            let mut woken = execution;
            woken.resume_data = Some(json!({ "event": event.payload }));
            match self.executions.update(org, woken, Some(ExecutionStatus::Paused)) {
                Ok(()) => {}
                Err(wfe_storage::StoreError::Conflict { .. }) => {
                    tracing::warn!(execution_id = %id, "execution no longer paused when waking for event; skipping");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    fn events_clock_ms(&self) -> u64 {
        self.launcher.epoch_ms()
    }
}

#[cfg(test)]
#[path = "event_router_tests.rs"]
mod tests;
