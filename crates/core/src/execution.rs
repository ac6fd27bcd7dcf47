// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Execution`: one run of one workflow, and `StepExecution`: its per-step
//! trace. Mirrors the job/step-record split the rest of this codebase uses
//! for durable, resumable units of work.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::{ExecutionId, OrganizationId, StepExecutionId, WorkflowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Pending,
    Running,
    Paused,
    Completed,
    Failed,
    Cancelled,
    /// Legacy terminal status, equivalent to `Completed` with
    /// `result = Blocked`. Kept for compatibility with older traces.
    Blocked,
}

impl ExecutionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ExecutionStatus::Completed
                | ExecutionStatus::Failed
                | ExecutionStatus::Cancelled
                | ExecutionStatus::Blocked
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionResult {
    Allowed,
    Blocked,
    Executed,
    Failed,
}

/// A single run of one workflow against one trigger event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub id: ExecutionId,
    pub execution_key: String,
    pub organization_id: OrganizationId,
    pub workflow_id: WorkflowId,

    pub trigger_event: String,
    pub trigger_payload: Value,
    pub context: Value,

    pub status: ExecutionStatus,
    pub result: Option<ExecutionResult>,

    pub started_at_ms: u64,
    pub completed_at_ms: Option<u64>,
    pub duration_ms: Option<u64>,
    pub error_message: Option<String>,

    pub paused_at_ms: Option<u64>,
    pub paused_reason: Option<String>,
    pub paused_step_id: Option<String>,
    pub next_step_id: Option<String>,
    pub resume_data: Option<Value>,
    pub resume_count: u32,
    pub last_resumed_at_ms: Option<u64>,

    pub timeout_at_ms: Option<u64>,
    pub timeout_duration_s: Option<u64>,
}

impl Execution {
    pub fn new(
        organization_id: OrganizationId,
        workflow_id: WorkflowId,
        execution_key: impl Into<String>,
        trigger_event: impl Into<String>,
        trigger_payload: Value,
        now_ms: u64,
        timeout_duration_s: Option<u64>,
    ) -> Self {
        Self {
            id: ExecutionId::new(),
            execution_key: execution_key.into(),
            organization_id,
            workflow_id,
            trigger_event: trigger_event.into(),
            trigger_payload,
            context: Value::Object(Default::default()),
            status: ExecutionStatus::Pending,
            result: None,
            started_at_ms: now_ms,
            completed_at_ms: None,
            duration_ms: None,
            error_message: None,
            paused_at_ms: None,
            paused_reason: None,
            paused_step_id: None,
            next_step_id: None,
            resume_data: None,
            resume_count: 0,
            last_resumed_at_ms: None,
            timeout_at_ms: timeout_duration_s.map(|s| now_ms + s * 1000),
            timeout_duration_s,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.status == ExecutionStatus::Paused
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Move into the paused state at `step_id`, recording where to resume
    /// and the hints the resumer needs to decide when to wake it.
    pub fn pause(&mut self, reason: impl Into<String>, current_step_id: &str, next_step_id: Option<String>, now_ms: u64) {
        self.status = ExecutionStatus::Paused;
        self.paused_at_ms = Some(now_ms);
        self.paused_reason = Some(reason.into());
        self.paused_step_id = Some(current_step_id.to_string());
        self.next_step_id = next_step_id;
        self.resume_data = None;
    }

    /// Transition out of pause back to running, merging `resume_data` into
    /// the execution's context and clearing pause bookkeeping. An
    /// approval-gated pause merges under `ctx.approval`; any other pause
    /// reason (a fired timer, a matching event) merges under `ctx.resume`.
    pub fn resume(&mut self, resume_data: Value, now_ms: u64) {
        self.status = ExecutionStatus::Running;
        self.resume_count += 1;
        self.last_resumed_at_ms = Some(now_ms);
        let namespace = if self.paused_reason.as_deref() == Some("approval_required") { "approval" } else { "resume" };
        merge_into(&mut self.context, namespace, resume_data);
        self.paused_at_ms = None;
        self.paused_reason = None;
        self.paused_step_id = None;
        self.resume_data = None;
    }

    pub fn complete(&mut self, result: ExecutionResult, now_ms: u64) {
        self.status = ExecutionStatus::Completed;
        self.result = Some(result);
        self.completed_at_ms = Some(now_ms);
        self.duration_ms = Some(now_ms.saturating_sub(self.started_at_ms));
    }

    pub fn fail(&mut self, message: impl Into<String>, now_ms: u64) {
        self.status = ExecutionStatus::Failed;
        self.result = Some(ExecutionResult::Failed);
        self.error_message = Some(message.into());
        self.completed_at_ms = Some(now_ms);
        self.duration_ms = Some(now_ms.saturating_sub(self.started_at_ms));
    }
}

fn merge_into(ctx: &mut Value, namespace: &str, data: Value) {
    if let Value::Object(map) = ctx {
        map.insert(namespace.to_string(), data);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepExecutionStatus {
    Running,
    Succeeded,
    Failed,
    Skipped,
}

/// An append-only trace record for one step attempt. Re-entering a step
/// (via a cycle or a resume) creates a fresh row rather than mutating one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepExecution {
    pub id: StepExecutionId,
    pub execution_id: ExecutionId,
    pub step_id: String,
    pub step_type: String,
    pub status: StepExecutionStatus,
    pub input: Value,
    pub output: Option<Value>,
    pub started_at_ms: u64,
    pub completed_at_ms: Option<u64>,
    pub duration_ms: Option<u64>,
    pub error_message: Option<String>,
}

impl StepExecution {
    pub fn start(execution_id: ExecutionId, step_id: &str, step_type: &str, input: Value, now_ms: u64) -> Self {
        Self {
            id: StepExecutionId::new(),
            execution_id,
            step_id: step_id.to_string(),
            step_type: step_type.to_string(),
            status: StepExecutionStatus::Running,
            input,
            output: None,
            started_at_ms: now_ms,
            completed_at_ms: None,
            duration_ms: None,
            error_message: None,
        }
    }

    pub fn finish(&mut self, status: StepExecutionStatus, output: Option<Value>, now_ms: u64) {
        self.status = status;
        self.output = output;
        self.completed_at_ms = Some(now_ms);
        self.duration_ms = Some(now_ms.saturating_sub(self.started_at_ms));
    }

    pub fn fail(&mut self, message: impl Into<String>, now_ms: u64) {
        self.error_message = Some(message.into());
        self.finish(StepExecutionStatus::Failed, None, now_ms);
    }
}

/// The outcome of advancing an execution through one or more steps.
/// Returned by the interpreter; never itself persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionResult {
    Completed(ExecutionResult),
    Paused { reason: String, next_step_id: Option<String>, resume_hints: Value },
    Failed(String),
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct ExecutionBuilder => Execution {
        computed { id: ExecutionId = ExecutionId::new() }
        into { execution_key: String = "exec-test" }
        computed { organization_id: OrganizationId = OrganizationId::new() }
        computed { workflow_id: WorkflowId = WorkflowId::new() }
        into { trigger_event: String = "order.created" }
        computed { trigger_payload: Value = Value::Object(Default::default()) }
        computed { context: Value = Value::Object(Default::default()) }
        set { status: ExecutionStatus = ExecutionStatus::Pending }
        option { result: ExecutionResult = None }
        set { started_at_ms: u64 = 0 }
        option { completed_at_ms: u64 = None }
        option { duration_ms: u64 = None }
        option { error_message: String = None }
        option { paused_at_ms: u64 = None }
        option { paused_reason: String = None }
        option { paused_step_id: String = None }
        option { next_step_id: String = None }
        option { resume_data: Value = None }
        set { resume_count: u32 = 0 }
        option { last_resumed_at_ms: u64 = None }
        option { timeout_at_ms: u64 = None }
        option { timeout_duration_s: u64 = None }
    }
}

#[cfg(test)]
#[path = "execution_tests.rs"]
mod tests;
