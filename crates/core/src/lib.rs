// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wfe-core: domain types and pure logic for the workflow execution engine.
//!
//! This crate has no I/O. It defines the workflow schema, the execution and
//! approval state machines, and the condition evaluator; everything that
//! touches a store, a network socket, or the clock lives in the crates built
//! on top of it.

pub mod macros;

pub mod approval;
pub mod clock;
pub mod context_cache;
pub mod duration_serde;
pub mod error;
pub mod evaluator;
pub mod event;
pub mod execution;
pub mod id;
pub mod ids;
pub mod schedule;
pub mod workflow;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use approval::{ApprovalRequest, ApprovalStatus};
pub use clock::{Clock, FakeClock, SystemClock};
pub use context_cache::ContextCacheEntry;
pub use error::{EvalError, WorkflowValidationError};
pub use event::Event;
pub use execution::{Execution, ExecutionResult, ExecutionStatus, StepExecution, StepExecutionStatus, TransitionResult};
pub use ids::{
    ApprovalRequestId, EventId, ExecutionId, OrganizationId, ScheduleId, StepExecutionId, WorkflowId,
};
pub use schedule::WorkflowSchedule;
pub use workflow::{
    ActionDecision, ActionSpec, Condition, ConditionCompound, ConditionLeaf, LogicalOp, Operator, Step,
    StepKind, Trigger, TriggerType, WaitSpec, Workflow,
};
