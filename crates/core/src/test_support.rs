// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use serde_json::json;

use crate::event::Event;
use crate::execution::Execution;
use crate::ids::{OrganizationId, WorkflowId};
use crate::workflow::{
    ActionDecision, Condition, ConditionLeaf, Operator, Step, StepKind, Trigger, TriggerType, WaitSpec, Workflow,
};

// ── Proptest strategies ─────────────────────────────────────────────────

pub mod strategies {
    use crate::execution::ExecutionStatus;
    use proptest::prelude::*;

    pub fn arb_execution_status() -> impl Strategy<Value = ExecutionStatus> {
        prop_oneof![
            Just(ExecutionStatus::Pending),
            Just(ExecutionStatus::Running),
            Just(ExecutionStatus::Paused),
            Just(ExecutionStatus::Completed),
            Just(ExecutionStatus::Failed),
            Just(ExecutionStatus::Cancelled),
        ]
    }
}

// ── Fixture workflows and events ─────────────────────────────────────────

/// A two-step workflow: `check-total` branches on `order.total`, routing to
/// an approval gate above the threshold or an immediate allow below it.
/// Mirrors the canonical end-to-end scenario in `SPEC_FULL.md` §8.
pub fn high_value_approval_workflow(organization_id: OrganizationId, threshold: f64) -> Workflow {
    Workflow {
        id: WorkflowId::new(),
        organization_id,
        workflow_key: "high-value-order".to_string(),
        version: "1".to_string(),
        name: "High value order approval".to_string(),
        enabled: true,
        trigger: Trigger { trigger_type: TriggerType::Event, event_type: Some("order.created".to_string()) },
        context_load: Vec::new(),
        steps: vec![
            Step {
                id: "check-total".to_string(),
                kind: StepKind::Condition {
                    condition: Condition::Leaf(ConditionLeaf {
                        field: "order.total".to_string(),
                        operator: Operator::Gt,
                        value: json!(threshold),
                    }),
                    on_true: Some("require".to_string()),
                    on_false: Some("approved".to_string()),
                },
            },
            Step {
                id: "require".to_string(),
                kind: StepKind::Action {
                    action: ActionDecision::RequireApproval,
                    reason: Some("order total exceeds threshold".to_string()),
                    next: None,
                },
            },
            Step {
                id: "approved".to_string(),
                kind: StepKind::Action { action: ActionDecision::Allow, reason: None, next: None },
            },
        ],
    }
}

/// A two-step workflow: `await-payment` pauses for a `payment.confirmed`
/// event, then `approved` allows once it arrives.
pub fn wait_for_event_workflow(organization_id: OrganizationId, for_event: impl Into<String>) -> Workflow {
    Workflow {
        id: WorkflowId::new(),
        organization_id,
        workflow_key: "await-payment".to_string(),
        version: "1".to_string(),
        name: "Await payment confirmation".to_string(),
        enabled: true,
        trigger: Trigger { trigger_type: TriggerType::Event, event_type: Some("order.created".to_string()) },
        context_load: Vec::new(),
        steps: vec![
            Step {
                id: "await-payment".to_string(),
                kind: StepKind::Wait { wait: WaitSpec::ForEvent { for_event: for_event.into() }, next: Some("approved".to_string()), on_timeout: None },
            },
            Step {
                id: "approved".to_string(),
                kind: StepKind::Action { action: ActionDecision::Allow, reason: None, next: None },
            },
        ],
    }
}

pub fn order_created_event(organization_id: OrganizationId, total: f64, now_ms: u64) -> Event {
    Event::builder()
        .organization_id(organization_id)
        .event_type("order.created")
        .payload(json!({ "order": { "total": total } }))
        .received_at_ms(now_ms)
        .build()
}

pub fn pending_execution(organization_id: OrganizationId, workflow_id: WorkflowId, now_ms: u64) -> Execution {
    Execution::new(organization_id, workflow_id, "exec-test", "order.created", json!({}), now_ms, None)
}
