// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Owns the approval request lifecycle and writes decisions onto the
//! associated execution's `resume_data` for the Resumer to pick up.
//! Publishes the approval lifecycle (`approval.required/granted/denied/
//! expired`) onto the `approvals` channel so subscribers can observe it
//! independently of the execution's own pause/resume events.

use std::sync::Arc;

use serde_json::json;
use wfe_adapters::MessageBus;
use wfe_core::{ApprovalRequest, ApprovalRequestId, Clock, ExecutionId, OrganizationId};
use wfe_storage::{ApprovalStore, ExecutionStore, StoreError};

pub struct ApprovalCoordinator<C: Clock> {
    approvals: Arc<dyn ApprovalStore>,
    executions: Arc<dyn ExecutionStore>,
    bus: Arc<dyn MessageBus>,
    clock: C,
}

impl<C: Clock> ApprovalCoordinator<C> {
    pub fn new(approvals: Arc<dyn ApprovalStore>, executions: Arc<dyn ExecutionStore>, bus: Arc<dyn MessageBus>, clock: C) -> Self {
        Self { approvals, executions, bus, clock }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        execution_id: ExecutionId,
        organization_id: OrganizationId,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        approver_role: impl Into<String>,
        reason: Option<String>,
        expires_in_s: Option<u64>,
    ) -> Result<ApprovalRequest, StoreError> {
        let now_ms = self.clock.epoch_ms();
        let request =
            ApprovalRequest::new(execution_id, entity_type.into(), entity_id.into(), approver_role.into(), reason, now_ms, expires_in_s);
        self.approvals.put(request.clone())?;
        let _ = self
            .bus
            .publish(
                "approvals",
                json!({
                    "type": "approval.required",
                    "approval_request_id": request.id,
                    "execution_id": execution_id,
                    "organization_id": organization_id,
                    "entity_type": request.entity_type,
                    "entity_id": request.entity_id,
                    "approver_role": request.approver_role,
                }),
            )
            .await;
        Ok(request)
    }

    pub async fn approve(&self, id: ApprovalRequestId, approver_id: impl Into<String>, reason: Option<String>) -> Result<(), StoreError> {
        self.decide(id, true, approver_id, reason).await
    }

    pub async fn reject(&self, id: ApprovalRequestId, approver_id: impl Into<String>, reason: Option<String>) -> Result<(), StoreError> {
        self.decide(id, false, approver_id, reason).await
    }

    async fn decide(&self, id: ApprovalRequestId, approved: bool, approver_id: impl Into<String>, reason: Option<String>) -> Result<(), StoreError> {
        let now_ms = self.clock.epoch_ms();
        let mut request = self.approvals.get(id)?;
        let status = if approved { wfe_core::ApprovalStatus::Approved } else { wfe_core::ApprovalStatus::Rejected };
        request.decide(status, approver_id.into(), reason, now_ms);
        self.approvals.put(request.clone())?;
        let org = self.write_resume_data(request.execution_id, request.resume_payload())?;
        if let Some(org) = org {
            let event_type = if approved { "approval.granted" } else { "approval.denied" };
            let _ = self
                .bus
                .publish(
                    "approvals",
                    json!({
                        "type": event_type,
                        "approval_request_id": request.id,
                        "execution_id": request.execution_id,
                        "organization_id": org,
                        "approver_id": request.decider_id,
                    }),
                )
                .await;
        }
        Ok(())
    }

    /// Scan pending requests past their expiry and transition them to
    /// `expired`, writing a negative decision so the Resumer unblocks the
    /// execution on its next tick.
    pub async fn expire_due(&self) -> Result<usize, StoreError> {
        let now_ms = self.clock.epoch_ms();
        let due = self.approvals.pending_expired(now_ms)?;
        let count = due.len();
        for mut request in due {
            request.expire(now_ms);
            self.approvals.put(request.clone())?;
            let org = self.write_resume_data(request.execution_id, request.resume_payload())?;
            if let Some(org) = org {
                let _ = self
                    .bus
                    .publish(
                        "approvals",
                        json!({
                            "type": "approval.expired",
                            "approval_request_id": request.id,
                            "execution_id": request.execution_id,
                            "organization_id": org,
                        }),
                    )
                    .await;
            }
        }
        Ok(count)
    }

    /// Returns the execution's organization on success, so the caller can
    /// publish under the right tenant; `None` means the execution wasn't
    /// found (already gone, or resumed and pruned elsewhere) and nothing
    /// was written or should be published.
    fn write_resume_data(&self, execution_id: ExecutionId, resume_data: serde_json::Value) -> Result<Option<OrganizationId>, StoreError> {
        // The coordinator only has an `ExecutionId`, not its organization;
        // `find_execution_anywhere` resolves it once so the conditional
        // update below can target the right tenant.
        let Some(mut execution) = find_execution_anywhere(self.executions.as_ref(), execution_id)? else {
            return Ok(None);
        };
        execution.resume_data = Some(resume_data);
        let org = execution.organization_id;
        let expected = Some(execution.status);
        self.executions.update(org, execution, expected).or_else(|err| match err {
            StoreError::Conflict { .. } => {
                tracing::warn!(%execution_id, "resume_data write lost a race with a concurrent status change");
                Ok(())
            }
            other => Err(other),
        })?;
        Ok(Some(org))
    }
}

/// `ExecutionStore::get_by_id` requires the caller's organization; the
/// coordinator only has an `ExecutionId`. `paused_ready` scans every
/// tenant, so it doubles as the lookup that resolves the owning org.
fn find_execution_anywhere(executions: &dyn ExecutionStore, execution_id: ExecutionId) -> Result<Option<wfe_core::Execution>, StoreError> {
    let candidates = executions.paused_ready(usize::MAX)?;
    Ok(candidates.into_iter().find(|e| e.id == execution_id))
}

#[cfg(test)]
#[path = "approval_coordinator_tests.rs"]
mod tests;
