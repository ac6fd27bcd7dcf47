// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory materialized state: the single source of truth for reads.
//! Mutated only by applying a [`crate::wal::WalEntry`] that has already been
//! durably appended.

use std::collections::HashMap;

use wfe_core::{
    ApprovalRequest, ApprovalRequestId, ContextCacheEntry, Event, EventId, Execution, ExecutionId, OrganizationId,
    StepExecution, Workflow, WorkflowId, WorkflowSchedule, ScheduleId,
};

use crate::wal::WalEntry;

#[derive(Default)]
pub struct StoreState {
    pub workflows: HashMap<WorkflowId, Workflow>,
    pub executions: HashMap<ExecutionId, Execution>,
    pub execution_key_index: HashMap<(OrganizationId, String), ExecutionId>,
    pub step_executions: HashMap<ExecutionId, Vec<StepExecution>>,
    pub approvals: HashMap<ApprovalRequestId, ApprovalRequest>,
    pub schedules: HashMap<ScheduleId, WorkflowSchedule>,
    pub cache: HashMap<String, ContextCacheEntry>,
    pub events: HashMap<EventId, Event>,
}

impl StoreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, entry: &WalEntry) {
        match entry {
            WalEntry::WorkflowPut(workflow) => {
                self.workflows.insert(workflow.id, (**workflow).clone());
            }
            WalEntry::ExecutionPut(execution) => {
                self.execution_key_index
                    .insert((execution.organization_id, execution.execution_key.clone()), execution.id);
                self.executions.insert(execution.id, (**execution).clone());
            }
            WalEntry::StepExecutionPut(step) => {
                let trace = self.step_executions.entry(step.execution_id).or_default();
                match trace.iter_mut().find(|existing| existing.id == step.id) {
                    Some(existing) => *existing = (**step).clone(),
                    None => trace.push((**step).clone()),
                }
            }
            WalEntry::ApprovalPut(approval) => {
                self.approvals.insert(approval.id, (**approval).clone());
            }
            WalEntry::SchedulePut(schedule) => {
                self.schedules.insert(schedule.id, (**schedule).clone());
            }
            WalEntry::CachePut(entry) => {
                self.cache.insert(entry.cache_key.clone(), (**entry).clone());
            }
            WalEntry::EventPut(event) => {
                self.events.insert(event.id, (**event).clone());
            }
        }
    }

    pub fn rebuild_from(entries: &[WalEntry]) -> Self {
        let mut state = Self::new();
        for entry in entries {
            state.apply(entry);
        }
        state
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
