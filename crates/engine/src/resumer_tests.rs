// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use serde_json::json;
use wfe_adapters::{FakeHttpSink, FakeMessageBus, FakeNotificationSink, FakeRecordSink};
use wfe_core::clock::FakeClock;
use wfe_core::test_support::{high_value_approval_workflow, order_created_event};
use wfe_core::{Clock, ExecutionStatus, OrganizationId, Step, StepKind, WaitSpec, Workflow};
use wfe_storage::{ExecutionStore, InMemoryWal, Storage, WorkflowStore};

use super::*;
use crate::action_executor::ActionExecutor;
use crate::approval_coordinator::ApprovalCoordinator;

fn harness(clock: FakeClock) -> (Resumer<FakeNotificationSink, FakeRecordSink, FakeHttpSink, FakeClock>, Arc<Storage>, Arc<FakeMessageBus>) {
    let storage = Arc::new(Storage::new(Arc::new(InMemoryWal::new())));
    let bus = Arc::new(FakeMessageBus::new());
    let actions = ActionExecutor::new(FakeNotificationSink::new(), FakeRecordSink::new(), FakeHttpSink::new());
    let approvals = ApprovalCoordinator::new(storage.clone(), storage.clone(), bus.clone(), clock.clone());
    let interpreter = Arc::new(Interpreter::new(actions, approvals, storage.clone(), bus.clone(), clock.clone()));
    let resumer = Resumer::new(storage.clone(), storage.clone(), interpreter, bus.clone(), clock, 10);
    (resumer, storage, bus)
}

#[tokio::test]
async fn approved_resume_data_resumes_and_completes_the_execution() {
    let clock = FakeClock::new();
    let (resumer, storage, bus) = harness(clock.clone());
    let org = OrganizationId::new();
    let workflow = high_value_approval_workflow(org, 1_000.0);
    WorkflowStore::put(&*storage, workflow.clone()).unwrap();

    let actions = ActionExecutor::new(FakeNotificationSink::new(), FakeRecordSink::new(), FakeHttpSink::new());
    let approvals = ApprovalCoordinator::new(storage.clone(), storage.clone(), bus.clone(), clock.clone());
    let interpreter = Interpreter::new(actions, approvals, storage.clone(), bus.clone(), clock.clone());
    let event = order_created_event(org, 5_000.0, clock.epoch_ms());
    let mut execution = wfe_core::Execution::new(org, workflow.id, "exec-1", event.event_type.clone(), event.payload.clone(), clock.epoch_ms(), None);
    execution.context = event.payload.clone();
    storage.create(execution.clone()).unwrap();
    interpreter.run(execution.clone(), &workflow).await.unwrap();
    let paused = storage.get_by_id(org, execution.id).unwrap();
    assert_eq!(paused.status, ExecutionStatus::Paused);

    let mut decided = paused;
    decided.resume_data = Some(json!({ "approved": true, "approver_id": "mgr-1" }));
    storage.update(org, decided, Some(ExecutionStatus::Paused)).unwrap();

    let resumed = resumer.tick().await.unwrap();
    assert_eq!(resumed, 1);

    let final_execution = storage.get_by_id(org, execution.id).unwrap();
    assert_eq!(final_execution.status, ExecutionStatus::Completed);
    assert!(bus.published().iter().any(|(channel, payload)| channel == "executions" && payload["type"] == "execution.resumed"));
}

#[tokio::test]
async fn resume_data_missing_approved_key_leaves_execution_paused() {
    let clock = FakeClock::new();
    let (resumer, storage, bus) = harness(clock.clone());
    let org = OrganizationId::new();
    let workflow = high_value_approval_workflow(org, 1_000.0);
    WorkflowStore::put(&*storage, workflow.clone()).unwrap();

    let actions = ActionExecutor::new(FakeNotificationSink::new(), FakeRecordSink::new(), FakeHttpSink::new());
    let approvals = ApprovalCoordinator::new(storage.clone(), storage.clone(), bus.clone(), clock.clone());
    let interpreter = Interpreter::new(actions, approvals, storage.clone(), bus, clock.clone());
    let event = order_created_event(org, 5_000.0, clock.epoch_ms());
    let mut execution = wfe_core::Execution::new(org, workflow.id, "exec-2", event.event_type.clone(), event.payload.clone(), clock.epoch_ms(), None);
    execution.context = event.payload.clone();
    storage.create(execution.clone()).unwrap();
    interpreter.run(execution.clone(), &workflow).await.unwrap();

    let mut malformed = storage.get_by_id(org, execution.id).unwrap();
    malformed.resume_data = Some(json!({ "note": "not a decision" }));
    storage.update(org, malformed, Some(ExecutionStatus::Paused)).unwrap();

    let resumed = resumer.tick().await.unwrap();
    assert_eq!(resumed, 0);
    assert_eq!(storage.get_by_id(org, execution.id).unwrap().status, ExecutionStatus::Paused);
}

fn wait_timer_workflow(organization_id: OrganizationId) -> Workflow {
    let mut workflow = high_value_approval_workflow(organization_id, 1_000.0);
    workflow.steps = vec![Step {
        id: "wait".to_string(),
        kind: StepKind::Wait { wait: WaitSpec::Duration { duration: std::time::Duration::from_secs(60) }, next: None, on_timeout: None },
    }];
    workflow
}

#[tokio::test]
async fn wait_timer_execution_is_untouched_before_its_deadline() {
    let clock = FakeClock::new();
    let (resumer, storage, bus) = harness(clock.clone());
    let org = OrganizationId::new();
    let workflow = wait_timer_workflow(org);
    WorkflowStore::put(&*storage, workflow.clone()).unwrap();

    let actions = ActionExecutor::new(FakeNotificationSink::new(), FakeRecordSink::new(), FakeHttpSink::new());
    let approvals = ApprovalCoordinator::new(storage.clone(), storage.clone(), bus.clone(), clock.clone());
    let interpreter = Interpreter::new(actions, approvals, storage.clone(), bus, clock.clone());
    let execution = wfe_core::Execution::new(org, workflow.id, "exec-3", "order.created", json!({}), clock.epoch_ms(), None);
    storage.create(execution.clone()).unwrap();
    interpreter.run(execution.clone(), &workflow).await.unwrap();

    let resumed = resumer.tick().await.unwrap();
    assert_eq!(resumed, 0);
    assert_eq!(storage.get_by_id(org, execution.id).unwrap().status, ExecutionStatus::Paused);
}

#[tokio::test]
async fn wait_timer_execution_resumes_once_its_deadline_has_passed() {
    let clock = FakeClock::new();
    let (resumer, storage, bus) = harness(clock.clone());
    let org = OrganizationId::new();
    let workflow = wait_timer_workflow(org);
    WorkflowStore::put(&*storage, workflow.clone()).unwrap();

    let actions = ActionExecutor::new(FakeNotificationSink::new(), FakeRecordSink::new(), FakeHttpSink::new());
    let approvals = ApprovalCoordinator::new(storage.clone(), storage.clone(), bus.clone(), clock.clone());
    let interpreter = Interpreter::new(actions, approvals, storage.clone(), bus.clone(), clock.clone());
    let execution = wfe_core::Execution::new(org, workflow.id, "exec-4", "order.created", json!({}), clock.epoch_ms(), None);
    storage.create(execution.clone()).unwrap();
    interpreter.run(execution.clone(), &workflow).await.unwrap();

    clock.advance(std::time::Duration::from_secs(61));
    let resumed = resumer.tick().await.unwrap();
    assert_eq!(resumed, 1);
    let final_execution = storage.get_by_id(org, execution.id).unwrap();
    assert_eq!(final_execution.status, ExecutionStatus::Completed);
    assert!(bus.published().iter().any(|(_, payload)| payload["type"] == "execution.resumed"));
}
