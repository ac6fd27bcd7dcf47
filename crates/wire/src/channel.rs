// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel-naming convention: `executions`, `executions:{id}`,
//! `workflows:{id}`, `approvals`.

use wfe_core::{ExecutionId, WorkflowId};

pub const EXECUTIONS: &str = "executions";
pub const APPROVALS: &str = "approvals";

pub fn execution(id: ExecutionId) -> String {
    format!("executions:{id}")
}

pub fn workflow(id: WorkflowId) -> String {
    format!("workflows:{}", id.as_str())
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
