// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared lookup for the `resume_hints` a paused step left behind. The
//! interpreter records them as the pausing `StepExecution`'s `output`;
//! the Resumer and EventRouter both need to read them back to decide
//! whether a paused execution is ready to wake.

use serde_json::Value;
use wfe_core::{ExecutionId, OrganizationId};
use wfe_storage::{ExecutionStore, StoreError};

pub(crate) fn paused_step_hints(
    executions: &dyn ExecutionStore,
    org: OrganizationId,
    execution_id: ExecutionId,
    step_id: &str,
) -> Result<Option<Value>, StoreError> {
    let trace = executions.trace(org, execution_id)?;
    Ok(trace.into_iter().rev().find(|s| s.step_id == step_id).and_then(|s| s.output))
}
