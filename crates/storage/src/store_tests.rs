// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::wal::InMemoryWal;
use wfe_core::test_support::pending_execution;
use wfe_core::ExecutionResult;

fn storage() -> Storage {
    Storage::new(Arc::new(InMemoryWal::new()))
}

#[test]
fn create_then_get_by_id_round_trips() {
    let store = storage();
    let org = OrganizationId::new();
    let execution = pending_execution(org, WorkflowId::new(), 1_000);
    let id = execution.id;
    store.create(execution).unwrap();

    let fetched = store.get_by_id(org, id).unwrap();
    assert_eq!(fetched.id, id);
}

#[test]
fn get_by_id_rejects_cross_org_access() {
    let store = storage();
    let org = OrganizationId::new();
    let other_org = OrganizationId::new();
    let execution = pending_execution(org, WorkflowId::new(), 1_000);
    let id = execution.id;
    store.create(execution).unwrap();

    assert!(matches!(store.get_by_id(other_org, id), Err(StoreError::NotFound)));
}

#[test]
fn get_by_key_resolves_through_index() {
    let store = storage();
    let org = OrganizationId::new();
    let execution = pending_execution(org, WorkflowId::new(), 1_000);
    let key = execution.execution_key.clone();
    store.create(execution).unwrap();

    let fetched = store.get_by_key(org, &key).unwrap();
    assert_eq!(fetched.execution_key, key);
}

#[test]
fn update_with_expected_status_rejects_stale_caller() {
    let store = storage();
    let org = OrganizationId::new();
    let mut execution = pending_execution(org, WorkflowId::new(), 1_000);
    execution.status = ExecutionStatus::Paused;
    let id = execution.id;
    store.create(execution.clone()).unwrap();

    execution.complete(ExecutionResult::Allowed, 2_000);
    let result = store.update(org, execution, Some(ExecutionStatus::Running));
    assert!(matches!(result, Err(StoreError::Conflict { .. })));

    // Stored row is untouched.
    let fetched = store.get_by_id(org, id).unwrap();
    assert_eq!(fetched.status, ExecutionStatus::Paused);
}

#[test]
fn update_with_matching_expected_status_succeeds() {
    let store = storage();
    let org = OrganizationId::new();
    let mut execution = pending_execution(org, WorkflowId::new(), 1_000);
    execution.status = ExecutionStatus::Paused;
    let id = execution.id;
    store.create(execution.clone()).unwrap();

    execution.resume(serde_json::json!({}), 2_000);
    store.update(org, execution, Some(ExecutionStatus::Paused)).unwrap();

    let fetched = store.get_by_id(org, id).unwrap();
    assert_eq!(fetched.status, ExecutionStatus::Running);
}

#[test]
fn paused_ready_orders_by_paused_at_ascending() {
    let store = storage();
    let org = OrganizationId::new();
    let mut later = pending_execution(org, WorkflowId::new(), 1_000);
    later.pause("wait_timer", "s1", None, 5_000);
    let mut earlier = pending_execution(org, WorkflowId::new(), 1_000);
    earlier.pause("wait_timer", "s1", None, 1_000);
    store.create(later).unwrap();
    store.create(earlier.clone()).unwrap();

    let ready = store.paused_ready(10).unwrap();
    assert_eq!(ready[0].id, earlier.id);
}

#[test]
fn timed_out_only_returns_running_or_paused_past_deadline() {
    let store = storage();
    let org = OrganizationId::new();
    let mut expired = pending_execution(org, WorkflowId::new(), 1_000);
    expired.status = ExecutionStatus::Running;
    expired.timeout_at_ms = Some(1_500);
    let mut not_yet = pending_execution(org, WorkflowId::new(), 1_000);
    not_yet.status = ExecutionStatus::Running;
    not_yet.timeout_at_ms = Some(9_000);
    store.create(expired.clone()).unwrap();
    store.create(not_yet).unwrap();

    let due = store.timed_out(2_000, 10).unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, expired.id);
}

#[test]
fn recover_rebuilds_state_from_wal() {
    let wal: Arc<dyn crate::wal::Wal> = Arc::new(InMemoryWal::new());
    let org = OrganizationId::new();
    let execution = pending_execution(org, WorkflowId::new(), 1_000);
    let id = execution.id;
    {
        let store = Storage::new(wal.clone());
        store.create(execution).unwrap();
    }

    let recovered = Storage::new(wal);
    recovered.recover().unwrap();
    assert_eq!(recovered.get_by_id(org, id).unwrap().id, id);
}

#[test]
fn event_put_then_get_round_trips() {
    let store = storage();
    let org = OrganizationId::new();
    let event = wfe_core::Event::builder().organization_id(org).event_type("order.created").received_at_ms(1_000).build();
    let id = event.id;
    EventStore::put(&store, event).unwrap();

    let fetched = EventStore::get(&store, org, id).unwrap();
    assert_eq!(fetched.id, id);
}

#[test]
fn event_get_rejects_cross_org_access() {
    let store = storage();
    let org = OrganizationId::new();
    let other_org = OrganizationId::new();
    let event = wfe_core::Event::builder().organization_id(org).event_type("order.created").received_at_ms(1_000).build();
    let id = event.id;
    EventStore::put(&store, event).unwrap();

    assert!(matches!(EventStore::get(&store, other_org, id), Err(StoreError::NotFound)));
}

#[test]
fn enabled_by_event_type_filters_disabled_and_other_orgs() {
    let store = storage();
    let org = OrganizationId::new();
    let workflow = wfe_core::test_support::high_value_approval_workflow(org, 1000.0);
    store.put(workflow.clone()).unwrap();

    let mut disabled = workflow.clone();
    disabled.id = WorkflowId::new();
    disabled.enabled = false;
    store.put(disabled).unwrap();

    let matches = store.enabled_by_event_type(org, "order.created").unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, workflow.id);
}
