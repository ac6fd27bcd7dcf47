// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use wfe_adapters::{FakeMessageBus, MessageBus};
use wfe_core::{ExecutionId, WorkflowId};

#[tokio::test]
async fn subscriber_receives_matching_events_on_its_channel() {
    let bus: Arc<dyn MessageBus> = Arc::new(FakeMessageBus::new());
    let broadcaster = Broadcaster::new(bus.clone());
    let shutdown = CancellationToken::new();
    let _dispatch = broadcaster.clone().spawn_dispatch(shutdown.clone());

    let mut handle = broadcaster.register();
    handle.subscribe("executions".to_string(), SubscriptionFilters::default());

    bus.publish("executions", json!({ "type": "execution.created", "execution_id": ExecutionId::new() })).await.unwrap();

    let message = tokio::time::timeout(std::time::Duration::from_secs(1), handle.rx.recv()).await.unwrap().unwrap();
    assert!(matches!(message, ServerMessage::ExecutionCreated { .. }));
    shutdown.cancel();
}

#[tokio::test]
async fn subscriber_does_not_receive_events_on_an_unsubscribed_channel() {
    let bus: Arc<dyn MessageBus> = Arc::new(FakeMessageBus::new());
    let broadcaster = Broadcaster::new(bus.clone());
    let shutdown = CancellationToken::new();
    let _dispatch = broadcaster.clone().spawn_dispatch(shutdown.clone());

    let mut handle = broadcaster.register();
    handle.subscribe("approvals".to_string(), SubscriptionFilters::default());

    bus.publish("executions", json!({ "type": "execution.created", "execution_id": ExecutionId::new() })).await.unwrap();

    let result = tokio::time::timeout(std::time::Duration::from_millis(200), handle.rx.recv()).await;
    assert!(result.is_err(), "expected no message to arrive within the timeout");
    shutdown.cancel();
}

#[tokio::test]
async fn workflow_id_filter_rejects_other_workflows() {
    let bus: Arc<dyn MessageBus> = Arc::new(FakeMessageBus::new());
    let broadcaster = Broadcaster::new(bus.clone());
    let shutdown = CancellationToken::new();
    let _dispatch = broadcaster.clone().spawn_dispatch(shutdown.clone());

    let wanted = WorkflowId::new();
    let other = WorkflowId::new();

    let mut handle = broadcaster.register();
    handle.subscribe("executions".to_string(), SubscriptionFilters { workflow_ids: vec![wanted], ..Default::default() });

    bus.publish("executions", json!({ "type": "execution.created", "execution_id": ExecutionId::new(), "workflow_id": other }))
        .await
        .unwrap();
    bus.publish("executions", json!({ "type": "execution.created", "execution_id": ExecutionId::new(), "workflow_id": wanted }))
        .await
        .unwrap();

    let message = tokio::time::timeout(std::time::Duration::from_secs(1), handle.rx.recv()).await.unwrap().unwrap();
    let ServerMessage::ExecutionCreated { data, .. } = message else { panic!("expected ExecutionCreated") };
    assert_eq!(data.get("workflow_id").and_then(|v| serde_json::from_value::<WorkflowId>(v.clone()).ok()), Some(wanted));
    shutdown.cancel();
}

#[tokio::test]
async fn dropping_the_handle_deregisters_the_subscriber() {
    let bus: Arc<dyn MessageBus> = Arc::new(FakeMessageBus::new());
    let broadcaster = Broadcaster::new(bus);
    let handle = broadcaster.register();
    assert_eq!(broadcaster.subscriber_count(), 1);
    drop(handle);
    assert_eq!(broadcaster.subscriber_count(), 0);
}
