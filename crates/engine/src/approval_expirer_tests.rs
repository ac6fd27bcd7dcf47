// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use wfe_adapters::FakeMessageBus;
use wfe_core::clock::FakeClock;
use wfe_core::test_support::{high_value_approval_workflow, pending_execution};
use wfe_core::ExecutionStatus;
use wfe_storage::{ExecutionStore, InMemoryWal, Storage};

use super::*;

#[tokio::test]
async fn expires_overdue_pending_approvals_and_writes_a_negative_decision() {
    let clock = FakeClock::new();
    let storage = Arc::new(Storage::new(Arc::new(InMemoryWal::new())));
    let bus = Arc::new(FakeMessageBus::new());
    let workflow = high_value_approval_workflow(wfe_core::OrganizationId::new(), 1_000.0);
    let mut execution = pending_execution(workflow.organization_id, workflow.id, clock.epoch_ms());
    execution.status = ExecutionStatus::Paused;
    storage.create(execution.clone()).unwrap();

    let coordinator = Arc::new(ApprovalCoordinator::new(storage.clone(), storage.clone(), bus.clone(), clock.clone()));
    let request = coordinator.create(execution.id, execution.organization_id, "order", "order-1", "manager", None, Some(60)).await.unwrap();

    clock.advance(std::time::Duration::from_secs(61));
    let expirer = ApprovalExpirer::new(coordinator);
    let expired = expirer.tick().await.unwrap();
    assert_eq!(expired, 1);

    let stored = storage.get_by_id(execution.organization_id, execution.id).unwrap();
    let resume_data = stored.resume_data.expect("expirer should have written resume_data");
    assert_eq!(resume_data["approved"], false);
    assert_eq!(resume_data["approval_request_id"], serde_json::json!(request.id));
    assert!(bus.published().iter().any(|(channel, payload)| channel == "approvals" && payload["type"] == "approval.expired"));
}

#[tokio::test]
async fn leaves_approvals_before_their_deadline_pending() {
    let clock = FakeClock::new();
    let storage = Arc::new(Storage::new(Arc::new(InMemoryWal::new())));
    let bus = Arc::new(FakeMessageBus::new());
    let workflow = high_value_approval_workflow(wfe_core::OrganizationId::new(), 1_000.0);
    let mut execution = pending_execution(workflow.organization_id, workflow.id, clock.epoch_ms());
    execution.status = ExecutionStatus::Paused;
    storage.create(execution.clone()).unwrap();

    let coordinator = Arc::new(ApprovalCoordinator::new(storage.clone(), storage.clone(), bus.clone(), clock.clone()));
    coordinator.create(execution.id, execution.organization_id, "order", "order-1", "manager", None, Some(3_600)).await.unwrap();

    let expirer = ApprovalExpirer::new(coordinator);
    let expired = expirer.tick().await.unwrap();
    assert_eq!(expired, 0);
}
