// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Organization-scoped storage traits and the default WAL-backed
//! implementation.
//!
//! `ExecutionStore` is the only component permitted to mutate `Execution`
//! and `StepExecution` rows; every other component (interpreter, resumer,
//! timeout enforcer) calls through it. `WorkflowStore`, `ApprovalStore`,
//! `ScheduleStore`, and `CacheStore` apply the same discipline to their own
//! row types.

use std::sync::Arc;

use parking_lot::RwLock;
use wfe_core::{
    ApprovalRequest, ApprovalRequestId, ContextCacheEntry, Event, EventId, Execution, ExecutionId, ExecutionStatus,
    OrganizationId, StepExecution, Workflow, WorkflowId, WorkflowSchedule,
};

use crate::error::StoreError;
use crate::state::StoreState;
use crate::wal::{SharedWal, WalEntry};

/// Filter for `ExecutionStore::list`.
#[derive(Debug, Clone, Default)]
pub struct ExecutionFilter {
    pub workflow_id: Option<WorkflowId>,
    pub status: Option<ExecutionStatus>,
}

#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self { offset: 0, limit: 50 }
    }
}

pub trait ExecutionStore: Send + Sync {
    fn create(&self, execution: Execution) -> Result<(), StoreError>;
    /// Full optimistic replace. If `expected_status` is given, the write is
    /// rejected with `StoreError::Conflict` unless the stored row's current
    /// status matches — this is what lets the resumer safely transition
    /// `paused -> running` exactly once under multi-replica contention.
    fn update(&self, org: OrganizationId, execution: Execution, expected_status: Option<ExecutionStatus>) -> Result<(), StoreError>;
    fn get_by_id(&self, org: OrganizationId, id: ExecutionId) -> Result<Execution, StoreError>;
    fn get_by_key(&self, org: OrganizationId, key: &str) -> Result<Execution, StoreError>;
    fn list(&self, org: OrganizationId, filter: ExecutionFilter, page: Page) -> Result<Vec<Execution>, StoreError>;
    fn trace(&self, org: OrganizationId, execution_id: ExecutionId) -> Result<Vec<StepExecution>, StoreError>;
    /// Paused executions ordered by `paused_at_ms` ascending, across all
    /// tenants — control loops iterate every organization.
    fn paused_ready(&self, limit: usize) -> Result<Vec<Execution>, StoreError>;
    /// Executions whose absolute deadline has passed, status in
    /// `{running, paused}`.
    fn timed_out(&self, now_ms: u64, limit: usize) -> Result<Vec<Execution>, StoreError>;

    fn put_step_execution(&self, step: StepExecution) -> Result<(), StoreError>;
}

pub trait WorkflowStore: Send + Sync {
    fn put(&self, workflow: Workflow) -> Result<(), StoreError>;
    fn get_by_id(&self, org: OrganizationId, id: WorkflowId) -> Result<Workflow, StoreError>;
    fn enabled_by_event_type(&self, org: OrganizationId, event_type: &str) -> Result<Vec<Workflow>, StoreError>;
}

pub trait ApprovalStore: Send + Sync {
    fn put(&self, approval: ApprovalRequest) -> Result<(), StoreError>;
    fn get(&self, id: ApprovalRequestId) -> Result<ApprovalRequest, StoreError>;
    fn pending_expired(&self, now_ms: u64) -> Result<Vec<ApprovalRequest>, StoreError>;
}

pub trait ScheduleStore: Send + Sync {
    fn put(&self, schedule: WorkflowSchedule) -> Result<(), StoreError>;
    fn due(&self, now_ms: u64) -> Result<Vec<WorkflowSchedule>, StoreError>;
}

pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<ContextCacheEntry>;
    fn put(&self, entry: ContextCacheEntry) -> Result<(), StoreError>;
}

pub trait EventStore: Send + Sync {
    fn put(&self, event: Event) -> Result<(), StoreError>;
    fn get(&self, org: OrganizationId, id: EventId) -> Result<Event, StoreError>;
}

/// The default storage implementation: a WAL-backed, in-memory
/// materialized state. A real deployment swaps the `Wal` for a durable one
/// without any store trait caller needing to change.
pub struct Storage {
    wal: SharedWal,
    state: Arc<RwLock<StoreState>>,
}

impl Storage {
    pub fn new(wal: SharedWal) -> Self {
        Self { wal, state: Arc::new(RwLock::new(StoreState::new())) }
    }

    /// Rebuild `StoreState` by replaying everything in the WAL. Call once at
    /// startup before serving traffic.
    pub fn recover(&self) -> Result<(), StoreError> {
        let entries = self.wal.replay()?;
        *self.state.write() = StoreState::rebuild_from(&entries);
        Ok(())
    }

    fn append(&self, entry: WalEntry) -> Result<(), StoreError> {
        self.wal.append(entry.clone())?;
        self.state.write().apply(&entry);
        Ok(())
    }
}

impl ExecutionStore for Storage {
    fn create(&self, execution: Execution) -> Result<(), StoreError> {
        self.append(WalEntry::ExecutionPut(Box::new(execution)))
    }

    fn update(&self, org: OrganizationId, execution: Execution, expected_status: Option<ExecutionStatus>) -> Result<(), StoreError> {
        if execution.organization_id != org {
            return Err(StoreError::OrganizationMismatch);
        }
        if let Some(expected) = expected_status {
            let current = self.get_by_id(org, execution.id)?;
            if current.status != expected {
                return Err(StoreError::Conflict {
                    expected: format!("{expected:?}"),
                    actual: format!("{:?}", current.status),
                });
            }
        }
        self.append(WalEntry::ExecutionPut(Box::new(execution)))
    }

    fn get_by_id(&self, org: OrganizationId, id: ExecutionId) -> Result<Execution, StoreError> {
        let state = self.state.read();
        let execution = state.executions.get(&id).ok_or(StoreError::NotFound)?;
        if execution.organization_id != org {
            return Err(StoreError::NotFound);
        }
        Ok(execution.clone())
    }

    fn get_by_key(&self, org: OrganizationId, key: &str) -> Result<Execution, StoreError> {
        let state = self.state.read();
        let id = state
            .execution_key_index
            .get(&(org, key.to_string()))
            .ok_or(StoreError::NotFound)?;
        state.executions.get(id).cloned().ok_or(StoreError::NotFound)
    }

    fn list(&self, org: OrganizationId, filter: ExecutionFilter, page: Page) -> Result<Vec<Execution>, StoreError> {
        let state = self.state.read();
        let mut matches: Vec<Execution> = state
            .executions
            .values()
            .filter(|e| e.organization_id == org)
            .filter(|e| filter.workflow_id.map_or(true, |w| e.workflow_id == w))
            .filter(|e| filter.status.map_or(true, |s| e.status == s))
            .cloned()
            .collect();
        matches.sort_by_key(|e| e.started_at_ms);
        Ok(matches.into_iter().skip(page.offset).take(page.limit).collect())
    }

    fn trace(&self, org: OrganizationId, execution_id: ExecutionId) -> Result<Vec<StepExecution>, StoreError> {
        let state = self.state.read();
        let execution = state.executions.get(&execution_id).ok_or(StoreError::NotFound)?;
        if execution.organization_id != org {
            return Err(StoreError::NotFound);
        }
        let mut trace = state.step_executions.get(&execution_id).cloned().unwrap_or_default();
        trace.sort_by_key(|s| s.started_at_ms);
        Ok(trace)
    }

    fn paused_ready(&self, limit: usize) -> Result<Vec<Execution>, StoreError> {
        let state = self.state.read();
        let mut paused: Vec<Execution> =
            state.executions.values().filter(|e| e.status == ExecutionStatus::Paused).cloned().collect();
        paused.sort_by_key(|e| e.paused_at_ms.unwrap_or(0));
        Ok(paused.into_iter().take(limit).collect())
    }

    fn timed_out(&self, now_ms: u64, limit: usize) -> Result<Vec<Execution>, StoreError> {
        let state = self.state.read();
        let mut due: Vec<Execution> = state
            .executions
            .values()
            .filter(|e| matches!(e.status, ExecutionStatus::Running | ExecutionStatus::Paused))
            .filter(|e| e.timeout_at_ms.is_some_and(|t| t < now_ms))
            .cloned()
            .collect();
        due.sort_by_key(|e| e.timeout_at_ms.unwrap_or(0));
        Ok(due.into_iter().take(limit).collect())
    }

    fn put_step_execution(&self, step: StepExecution) -> Result<(), StoreError> {
        self.append(WalEntry::StepExecutionPut(Box::new(step)))
    }
}

impl WorkflowStore for Storage {
    fn put(&self, workflow: Workflow) -> Result<(), StoreError> {
        self.append(WalEntry::WorkflowPut(Box::new(workflow)))
    }

    fn get_by_id(&self, org: OrganizationId, id: WorkflowId) -> Result<Workflow, StoreError> {
        let state = self.state.read();
        let workflow = state.workflows.get(&id).ok_or(StoreError::NotFound)?;
        if workflow.organization_id != org {
            return Err(StoreError::NotFound);
        }
        Ok(workflow.clone())
    }

    fn enabled_by_event_type(&self, org: OrganizationId, event_type: &str) -> Result<Vec<Workflow>, StoreError> {
        let state = self.state.read();
        Ok(state
            .workflows
            .values()
            .filter(|w| w.organization_id == org)
            .filter(|w| w.enabled)
            .filter(|w| w.trigger.event_type.as_deref() == Some(event_type))
            .cloned()
            .collect())
    }
}

impl ApprovalStore for Storage {
    fn put(&self, approval: ApprovalRequest) -> Result<(), StoreError> {
        self.append(WalEntry::ApprovalPut(Box::new(approval)))
    }

    fn get(&self, id: ApprovalRequestId) -> Result<ApprovalRequest, StoreError> {
        self.state.read().approvals.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    fn pending_expired(&self, now_ms: u64) -> Result<Vec<ApprovalRequest>, StoreError> {
        Ok(self.state.read().approvals.values().filter(|a| a.is_expired_at(now_ms)).cloned().collect())
    }
}

impl ScheduleStore for Storage {
    fn put(&self, schedule: WorkflowSchedule) -> Result<(), StoreError> {
        self.append(WalEntry::SchedulePut(Box::new(schedule)))
    }

    fn due(&self, now_ms: u64) -> Result<Vec<WorkflowSchedule>, StoreError> {
        Ok(self
            .state
            .read()
            .schedules
            .values()
            .filter(|s| s.enabled && s.next_trigger_at_ms.is_some_and(|t| t <= now_ms))
            .cloned()
            .collect())
    }
}

impl CacheStore for Storage {
    fn get(&self, key: &str) -> Option<ContextCacheEntry> {
        self.state.read().cache.get(key).cloned()
    }

    fn put(&self, entry: ContextCacheEntry) -> Result<(), StoreError> {
        self.append(WalEntry::CachePut(Box::new(entry)))
    }
}

impl EventStore for Storage {
    fn put(&self, event: Event) -> Result<(), StoreError> {
        self.append(WalEntry::EventPut(Box::new(event)))
    }

    fn get(&self, org: OrganizationId, id: EventId) -> Result<Event, StoreError> {
        let event = self.state.read().events.get(&id).cloned().ok_or(StoreError::NotFound)?;
        if event.organization_id != org {
            return Err(StoreError::OrganizationMismatch);
        }
        Ok(event)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
