// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn decide_approved_sets_terminal_fields() {
    let mut req = ApprovalRequest::builder().build();
    req.decide(ApprovalStatus::Approved, "mgr-1", Some("looks fine".to_string()), 5_000);
    assert_eq!(req.status, ApprovalStatus::Approved);
    assert_eq!(req.decider_id.as_deref(), Some("mgr-1"));
    assert_eq!(req.decided_at_ms, Some(5_000));
}

#[test]
fn decide_is_idempotent_once_terminal() {
    let mut req = ApprovalRequest::builder().build();
    req.decide(ApprovalStatus::Approved, "mgr-1", None, 5_000);
    req.decide(ApprovalStatus::Rejected, "mgr-2", None, 6_000);
    assert_eq!(req.status, ApprovalStatus::Approved);
    assert_eq!(req.decider_id.as_deref(), Some("mgr-1"));
}

#[test]
fn expire_only_applies_to_pending() {
    let mut req = ApprovalRequest::builder().build();
    req.expire(9_000);
    assert_eq!(req.status, ApprovalStatus::Expired);

    let mut approved = ApprovalRequest::builder().status(ApprovalStatus::Approved).build();
    approved.expire(9_000);
    assert_eq!(approved.status, ApprovalStatus::Approved);
}

#[test]
fn is_expired_at_respects_deadline() {
    let req = ApprovalRequest::builder().expires_at_ms(1_000u64).build();
    assert!(!req.is_expired_at(500));
    assert!(req.is_expired_at(1_500));
}

#[test]
fn resume_payload_reflects_approval_decision() {
    let mut req = ApprovalRequest::builder().build();
    req.decide(ApprovalStatus::Rejected, "mgr-1", Some("too risky".to_string()), 1_000);
    let payload = req.resume_payload();
    assert_eq!(payload["approved"], false);
    assert_eq!(payload["decision_reason"], "too risky");
}
