// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wfe submit-event` talks to the on-disk store directly; no daemon
//! needs to be running for it to succeed.

use serde_json::Value;

use crate::support::TempState;

#[test]
fn submit_event_with_no_workflows_registered_triggers_nothing() {
    let state = TempState::new();

    let output = state
        .wfe()
        .args([
            "--output",
            "json",
            "submit-event",
            "--organization-id",
            "00000000-0000-0000-0000-000000000001",
            "--event-type",
            "order.created",
            "--source",
            "checkout-service",
            "--payload",
            r#"{"order_id": 42}"#,
        ])
        .output()
        .expect("run wfe submit-event");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let parsed: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert!(parsed.get("event_id").is_some(), "response missing event_id: {parsed}");
    assert_eq!(parsed["triggered_executions"].as_array().map(Vec::len), Some(0));
}

#[test]
fn submit_event_rejects_malformed_payload() {
    let state = TempState::new();

    let output = state
        .wfe()
        .args([
            "submit-event",
            "--organization-id",
            "00000000-0000-0000-0000-000000000001",
            "--event-type",
            "order.created",
            "--source",
            "checkout-service",
            "--payload",
            "not json",
        ])
        .output()
        .expect("run wfe submit-event");

    assert!(!output.status.success(), "expected a malformed payload to fail");
}
