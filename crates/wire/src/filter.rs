// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscription filters: a subscriber narrows a channel to the workflows,
//! executions, or statuses it cares about.

use serde::{Deserialize, Serialize};
use wfe_core::{ExecutionId, WorkflowId};

/// A message is delivered to a subscriber iff every non-empty filter list
/// matches the message's corresponding field. An empty list matches
/// everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionFilters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub workflow_ids: Vec<WorkflowId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub execution_ids: Vec<ExecutionId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<String>,
}

impl SubscriptionFilters {
    pub fn matches(&self, workflow_id: WorkflowId, execution_id: ExecutionId, status: &str) -> bool {
        (self.workflow_ids.is_empty() || self.workflow_ids.contains(&workflow_id))
            && (self.execution_ids.is_empty() || self.execution_ids.contains(&execution_id))
            && (self.statuses.is_empty() || self.statuses.iter().any(|s| s == status))
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
