// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn empty_filters_match_everything() {
    let filters = SubscriptionFilters::default();
    assert!(filters.matches(WorkflowId::new(), ExecutionId::new(), "running"));
}

#[test]
fn workflow_id_filter_rejects_other_workflows() {
    let wanted = WorkflowId::new();
    let filters = SubscriptionFilters { workflow_ids: vec![wanted], ..Default::default() };

    assert!(filters.matches(wanted, ExecutionId::new(), "running"));
    assert!(!filters.matches(WorkflowId::new(), ExecutionId::new(), "running"));
}

#[test]
fn status_filter_rejects_other_statuses() {
    let filters = SubscriptionFilters { statuses: vec!["failed".to_string()], ..Default::default() };

    assert!(filters.matches(WorkflowId::new(), ExecutionId::new(), "failed"));
    assert!(!filters.matches(WorkflowId::new(), ExecutionId::new(), "running"));
}

#[test]
fn all_filters_must_match_when_present() {
    let workflow_id = WorkflowId::new();
    let filters =
        SubscriptionFilters { workflow_ids: vec![workflow_id], statuses: vec!["paused".to_string()], ..Default::default() };

    assert!(filters.matches(workflow_id, ExecutionId::new(), "paused"));
    assert!(!filters.matches(workflow_id, ExecutionId::new(), "running"));
}
