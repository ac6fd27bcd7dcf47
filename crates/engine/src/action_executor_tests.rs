// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use wfe_adapters::{FakeHttpSink, FakeNotificationSink, FakeRecordSink};

fn executor() -> ActionExecutor<FakeNotificationSink, FakeRecordSink, FakeHttpSink> {
    ActionExecutor::new(FakeNotificationSink::new(), FakeRecordSink::new(), FakeHttpSink::new())
}

#[tokio::test]
async fn notify_substitutes_template_before_sending() {
    let executor = executor();
    let ctx = json!({"order": {"total": 1200}});
    let action = ActionSpec::Notify {
        recipients: vec!["ops@example.com".into()],
        template: Some("order total is {{ .order.total }}".into()),
        params: Default::default(),
    };

    let output = executor.execute(&action, &ctx).await.unwrap();
    assert_eq!(output, ActionOutput::Notified);
    assert_eq!(executor.notifications.calls()[0].body, "order total is 1200");
}

#[tokio::test]
async fn webhook_substitutes_url_and_body() {
    let executor = executor();
    executor.http.set_response(json!({"ok": true}));
    let ctx = json!({"order": {"id": "o-1"}});
    let action = ActionSpec::Webhook {
        url: "https://example.com/hooks/{{ .order.id }}".into(),
        body: json!({"order_id": "{{ .order.id }}"}).as_object().unwrap().clone(),
    };

    let output = executor.execute(&action, &ctx).await.unwrap();
    assert_eq!(output, ActionOutput::HttpResponse(json!({"ok": true})));
    let call = &executor.http.calls()[0];
    assert_eq!(call.url, "https://example.com/hooks/o-1");
    assert_eq!(call.body["order_id"], json!("o-1"));
}

#[tokio::test]
async fn create_record_returns_assigned_id() {
    let executor = executor();
    let ctx = json!({});
    let action = ActionSpec::CreateRecord { entity_type: "review".into(), fields: Default::default() };

    let output = executor.execute(&action, &ctx).await.unwrap();
    assert!(matches!(output, ActionOutput::RecordCreated { entity_id } if entity_id == "review-1"));
}

#[tokio::test]
async fn update_record_substitutes_entity_id() {
    let executor = executor();
    let ctx = json!({"order": {"id": "o-1"}});
    let action = ActionSpec::UpdateRecord {
        entity_type: "order".into(),
        entity_id: "{{ .order.id }}".into(),
        fields: Default::default(),
    };

    let output = executor.execute(&action, &ctx).await.unwrap();
    assert_eq!(output, ActionOutput::RecordUpdated);
}

#[tokio::test]
async fn create_approval_request_is_a_signal_not_a_dispatch() {
    let executor = executor();
    let ctx = json!({});
    let action = ActionSpec::CreateApprovalRequest {
        entity_type: "order".into(),
        entity_id: "o-1".into(),
        approver_role: "manager".into(),
        reason: None,
        expires_in_s: None,
    };

    let output = executor.execute(&action, &ctx).await.unwrap();
    assert_eq!(output, ActionOutput::ApprovalRequested);
    assert!(executor.notifications.calls().is_empty());
}

#[tokio::test]
async fn unresolved_placeholder_surfaces_as_action_error() {
    let executor = executor();
    let ctx = json!({});
    let action = ActionSpec::Webhook { url: "https://example.com/{{ .missing }}".into(), body: Default::default() };

    let err = executor.execute(&action, &ctx).await.unwrap_err();
    assert!(matches!(err, ActionError::UnresolvedPath(path) if path == "missing"));
}
