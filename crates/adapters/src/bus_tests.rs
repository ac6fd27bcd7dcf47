// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[tokio::test]
async fn local_bus_fans_out_to_subscribers() {
    let bus = LocalMessageBus::new(16);
    let mut rx = bus.subscribe();

    bus.publish("executions", json!({"type": "execution.started"})).await.unwrap();

    let (channel, payload) = rx.recv().await.unwrap();
    assert_eq!(channel, "executions");
    assert_eq!(payload, json!({"type": "execution.started"}));
}

#[tokio::test]
async fn local_bus_publish_without_subscribers_does_not_error() {
    let bus = LocalMessageBus::new(16);
    bus.publish("executions", json!({})).await.unwrap();
}

#[tokio::test]
async fn fake_bus_records_every_publish() {
    let bus = FakeMessageBus::new();
    bus.publish("approvals", json!({"id": 1})).await.unwrap();
    bus.publish("approvals", json!({"id": 2})).await.unwrap();

    assert_eq!(bus.published().len(), 2);
}
