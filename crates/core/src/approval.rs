// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ApprovalRequest`: a durable human-in-the-loop decision point spawned by a
//! `require_approval` action.

use serde::{Deserialize, Serialize};

use crate::ids::{ApprovalRequestId, ExecutionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
    Expired,
}

impl ApprovalStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ApprovalStatus::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub id: ApprovalRequestId,
    pub execution_id: ExecutionId,
    pub entity_type: String,
    pub entity_id: String,
    pub approver_role: String,
    pub requester_id: Option<String>,
    pub status: ApprovalStatus,
    pub reason: Option<String>,
    pub decision_reason: Option<String>,
    pub decider_id: Option<String>,
    pub requested_at_ms: u64,
    pub decided_at_ms: Option<u64>,
    pub expires_at_ms: Option<u64>,
}

impl ApprovalRequest {
    pub fn new(
        execution_id: ExecutionId,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        approver_role: impl Into<String>,
        reason: Option<String>,
        now_ms: u64,
        expires_in_s: Option<u64>,
    ) -> Self {
        Self {
            id: ApprovalRequestId::new(),
            execution_id,
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            approver_role: approver_role.into(),
            requester_id: None,
            status: ApprovalStatus::Pending,
            reason,
            decision_reason: None,
            decider_id: None,
            requested_at_ms: now_ms,
            decided_at_ms: None,
            expires_at_ms: expires_in_s.map(|s| now_ms + s * 1000),
        }
    }

    pub fn decide(&mut self, status: ApprovalStatus, approver: impl Into<String>, reason: Option<String>, now_ms: u64) {
        debug_assert!(status.is_terminal(), "decide() requires a terminal status");
        if self.status.is_terminal() {
            return;
        }
        self.status = status;
        self.decider_id = Some(approver.into());
        self.decision_reason = reason;
        self.decided_at_ms = Some(now_ms);
    }

    pub fn expire(&mut self, now_ms: u64) {
        if self.status != ApprovalStatus::Pending {
            return;
        }
        self.status = ApprovalStatus::Expired;
        self.decided_at_ms = Some(now_ms);
    }

    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        self.status == ApprovalStatus::Pending && self.expires_at_ms.is_some_and(|exp| exp < now_ms)
    }

    /// The `resume_data` fragment the resumer writes onto the parent
    /// execution once this request reaches a terminal status.
    pub fn resume_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "approved": self.status == ApprovalStatus::Approved,
            "approval_request_id": self.id,
            "approver_id": self.decider_id,
            "decision_reason": self.decision_reason,
        })
    }
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct ApprovalRequestBuilder => ApprovalRequest {
        computed { id: ApprovalRequestId = ApprovalRequestId::new() }
        computed { execution_id: ExecutionId = ExecutionId::new() }
        into { entity_type: String = "order" }
        into { entity_id: String = "order-1" }
        into { approver_role: String = "manager" }
        option { requester_id: String = None }
        set { status: ApprovalStatus = ApprovalStatus::Pending }
        option { reason: String = None }
        option { decision_reason: String = None }
        option { decider_id: String = None }
        set { requested_at_ms: u64 = 0 }
        option { decided_at_ms: u64 = None }
        option { expires_at_ms: u64 = None }
    }
}

#[cfg(test)]
#[path = "approval_tests.rs"]
mod tests;
