// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[tokio::test]
async fn fake_create_record_assigns_incrementing_ids() {
    let sink = FakeRecordSink::new();
    let fields = json!({"status": "blocked"}).as_object().unwrap().clone();

    let first = sink.create_record("order", &fields).await.unwrap();
    let second = sink.create_record("order", &fields).await.unwrap();

    assert_eq!(first, "order-1");
    assert_eq!(second, "order-2");
    assert_eq!(sink.calls().len(), 2);
}

#[tokio::test]
async fn fake_update_record_is_recorded() {
    let sink = FakeRecordSink::new();
    let fields = json!({"status": "approved"}).as_object().unwrap().clone();

    sink.update_record("order", "order-1", &fields).await.unwrap();

    match &sink.calls()[0] {
        RecordCall::Update { entity_type, entity_id, .. } => {
            assert_eq!(entity_type, "order");
            assert_eq!(entity_id, "order-1");
        }
        RecordCall::Create { .. } => panic!("expected update call"),
    }
}
