// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The interpreter: walks one execution through its workflow's step graph
//! one step at a time, never concurrently with itself.

use std::sync::Arc;

use serde_json::{json, Value};
use wfe_adapters::{HttpSink, MessageBus, NotificationSink, RecordSink};
use wfe_core::{
    ActionDecision, ActionSpec, Clock, Execution, ExecutionResult, StepExecution, StepExecutionStatus, StepKind, TransitionResult, Workflow,
};
use wfe_storage::{ApprovalStore, ExecutionStore};

use crate::action_executor::{ActionExecutor, ActionOutput};
use crate::approval_coordinator::ApprovalCoordinator;
use crate::error::EngineError;
use crate::template::substitute_str;

pub struct Interpreter<N, R, H, C: Clock> {
    actions: ActionExecutor<N, R, H>,
    approvals: ApprovalCoordinator<C>,
    executions: Arc<dyn ExecutionStore>,
    bus: Arc<dyn MessageBus>,
    clock: C,
}

impl<N, R, H, C> Interpreter<N, R, H, C>
where
    N: NotificationSink,
    R: RecordSink,
    H: HttpSink,
    C: Clock,
{
    pub fn new(
        actions: ActionExecutor<N, R, H>,
        approvals: ApprovalCoordinator<C>,
        executions: Arc<dyn ExecutionStore>,
        bus: Arc<dyn MessageBus>,
        clock: C,
    ) -> Self {
        Self { actions, approvals, executions, bus, clock }
    }

    /// Advance `execution` through `workflow` until it completes, pauses,
    /// or fails. `execution` must already have been persisted by the
    /// caller (EventRouter on creation, Resumer on wake).
    pub async fn run(&self, mut execution: Execution, workflow: &Workflow) -> Result<TransitionResult, EngineError> {
        // A fresh execution has no `next_step_id`, so it starts at the
        // workflow's entry point. A resumed one carries where the step
        // that paused it left off.
        let mut current_step_id = execution.next_step_id.clone().or_else(|| workflow.first_step_id().map(str::to_string));

        loop {
            let Some(step_id) = current_step_id.clone() else {
                let result = ExecutionResult::Allowed;
                execution.complete(result, self.clock.epoch_ms());
                self.persist(&execution)?;
                self.publish_execution_event("execution.completed", &execution).await;
                return Ok(TransitionResult::Completed(result));
            };

            let Some(step) = workflow.step(&step_id) else {
                let message = format!("unknown step '{step_id}'");
                execution.fail(message.clone(), self.clock.epoch_ms());
                self.persist(&execution)?;
                self.publish_execution_event("execution.failed", &execution).await;
                return Ok(TransitionResult::Failed(message));
            };

            let mut trace = StepExecution::start(execution.id, &step_id, step.kind.label(), execution.context.clone(), self.clock.epoch_ms());
            self.executions.put_step_execution(trace.clone())?;

            match self.dispatch_step(&step.kind, &execution).await {
                Ok(StepOutcome::Advance(next)) => {
                    trace.finish(StepExecutionStatus::Succeeded, None, self.clock.epoch_ms());
                    self.executions.put_step_execution(trace)?;
                    current_step_id = next;
                }
                Ok(StepOutcome::Pause { reason, next_step_id, resume_hints }) => {
                    trace.finish(StepExecutionStatus::Succeeded, Some(resume_hints.clone()), self.clock.epoch_ms());
                    self.executions.put_step_execution(trace)?;
                    execution.pause(reason.clone(), &step_id, next_step_id.clone(), self.clock.epoch_ms());
                    self.persist(&execution)?;
                    self.publish_execution_event("execution.paused", &execution).await;
                    return Ok(TransitionResult::Paused { reason, next_step_id, resume_hints });
                }
                Ok(StepOutcome::Terminate(result)) => {
                    trace.finish(StepExecutionStatus::Succeeded, None, self.clock.epoch_ms());
                    self.executions.put_step_execution(trace)?;
                    execution.complete(result, self.clock.epoch_ms());
                    self.persist(&execution)?;
                    self.publish_execution_event("execution.completed", &execution).await;
                    return Ok(TransitionResult::Completed(result));
                }
                Err(err) => {
                    let message = err.to_string();
                    trace.fail(message.clone(), self.clock.epoch_ms());
                    self.executions.put_step_execution(trace)?;
                    execution.fail(message.clone(), self.clock.epoch_ms());
                    self.persist(&execution)?;
                    self.publish_execution_event("execution.failed", &execution).await;
                    return Ok(TransitionResult::Failed(message));
                }
            }
        }
    }

    async fn dispatch_step(&self, kind: &StepKind, execution: &Execution) -> Result<StepOutcome, EngineError> {
        match kind {
            StepKind::Condition { condition, on_true, on_false } => {
                let matched = wfe_core::evaluator::evaluate(condition, &execution.context)?;
                let branch = if matched { on_true } else { on_false };
                match branch {
                    Some(next) => Ok(StepOutcome::Advance(Some(next.clone()))),
                    None => Ok(StepOutcome::Terminate(ExecutionResult::Allowed)),
                }
            }
            StepKind::Action { action, reason, next } => self.dispatch_action_decision(*action, reason.as_deref(), next.clone(), execution).await,
            StepKind::Execute { execute, next } => self.dispatch_execute(execute, next.clone(), execution).await,
            StepKind::Wait { wait, next, on_timeout } => Ok(self.dispatch_wait(wait, next.clone(), on_timeout.clone())),
            StepKind::Parallel | StepKind::Foreach => {
                unreachable!("Workflow::validate rejects parallel/foreach before the interpreter ever sees one")
            }
        }
    }

    async fn dispatch_action_decision(
        &self,
        action: ActionDecision,
        reason: Option<&str>,
        next: Option<String>,
        execution: &Execution,
    ) -> Result<StepOutcome, EngineError> {
        match action {
            ActionDecision::Allow => Ok(StepOutcome::Terminate(ExecutionResult::Allowed)),
            ActionDecision::Block => Ok(StepOutcome::Terminate(ExecutionResult::Blocked)),
            ActionDecision::RequireApproval => {
                let reason = reason.map(str::to_string).unwrap_or_else(|| "approval_required".to_string());
                let request = self
                    .approvals
                    .create(execution.id, execution.organization_id, "execution", execution.id.to_string(), "manager", Some(reason), None)
                    .await?;
                Ok(StepOutcome::Pause {
                    reason: "approval_required".to_string(),
                    next_step_id: next,
                    resume_hints: json!({ "approval_request_id": request.id }),
                })
            }
        }
    }

    async fn dispatch_execute(&self, specs: &[ActionSpec], next: Option<String>, execution: &Execution) -> Result<StepOutcome, EngineError> {
        for spec in specs {
            if matches!(spec, ActionSpec::CreateApprovalRequest { .. }) {
                let ActionSpec::CreateApprovalRequest { entity_type, entity_id, approver_role, reason, expires_in_s } = spec else {
                    unreachable!()
                };
                let entity_id = substitute_str(entity_id, &execution.context)?;
                let request = self
                    .approvals
                    .create(execution.id, execution.organization_id, entity_type.clone(), entity_id, approver_role.clone(), reason.clone(), *expires_in_s)
                    .await?;
                return Ok(StepOutcome::Pause {
                    reason: "approval_required".to_string(),
                    next_step_id: next,
                    resume_hints: json!({ "approval_request_id": request.id }),
                });
            }
            self.actions.execute(spec, &execution.context).await?;
        }
        Ok(StepOutcome::Advance(next))
    }

    fn dispatch_wait(&self, wait: &wfe_core::WaitSpec, next: Option<String>, on_timeout: Option<String>) -> StepOutcome {
        match wait {
            wfe_core::WaitSpec::ForEvent { for_event } => StepOutcome::Pause {
                reason: "wait_event".to_string(),
                next_step_id: next,
                resume_hints: json!({ "event_type": for_event, "on_timeout_step": on_timeout }),
            },
            wfe_core::WaitSpec::Duration { duration } => {
                let timeout_at_ms = self.clock.epoch_ms() + duration.as_millis() as u64;
                StepOutcome::Pause {
                    reason: "wait_timer".to_string(),
                    next_step_id: next,
                    resume_hints: json!({ "timeout_at": timeout_at_ms, "on_timeout_step": on_timeout }),
                }
            }
        }
    }

    fn persist(&self, execution: &Execution) -> Result<(), EngineError> {
        let org = execution.organization_id;
        Ok(self.executions.update(org, execution.clone(), None)?)
    }

    async fn publish_execution_event(&self, event_type: &str, execution: &Execution) {
        let _ = self
            .bus
            .publish(
                "executions",
                json!({
                    "type": event_type,
                    "execution_id": execution.id,
                    "organization_id": execution.organization_id,
                    "workflow_id": execution.workflow_id,
                    "status": execution.status,
                }),
            )
            .await;
    }
}

enum StepOutcome {
    Advance(Option<String>),
    Pause { reason: String, next_step_id: Option<String>, resume_hints: Value },
    Terminate(ExecutionResult),
}

#[cfg(test)]
#[path = "interpreter_tests.rs"]
mod tests;
