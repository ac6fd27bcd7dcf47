// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use wfe_core::test_support::pending_execution;
use wfe_core::{OrganizationId, WorkflowId};

#[test]
fn in_memory_wal_replays_appended_entries_in_order() {
    let wal = InMemoryWal::new();
    let org = OrganizationId::new();
    let e1 = pending_execution(org, WorkflowId::new(), 1_000);
    let e2 = pending_execution(org, WorkflowId::new(), 2_000);
    wal.append(WalEntry::ExecutionPut(Box::new(e1.clone()))).unwrap();
    wal.append(WalEntry::ExecutionPut(Box::new(e2.clone()))).unwrap();

    let replayed = wal.replay().unwrap();
    assert_eq!(replayed.len(), 2);
    match &replayed[0] {
        WalEntry::ExecutionPut(e) => assert_eq!(e.id, e1.id),
        other => panic!("unexpected entry: {other:?}"),
    }
}

#[test]
fn file_wal_persists_entries_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wal.log");
    let org = OrganizationId::new();
    let execution = pending_execution(org, WorkflowId::new(), 1_000);

    {
        let wal = FileWal::open(&path).unwrap();
        wal.append(WalEntry::ExecutionPut(Box::new(execution.clone()))).unwrap();
    }

    let reopened = FileWal::open(&path).unwrap();
    let replayed = reopened.replay().unwrap();
    assert_eq!(replayed.len(), 1);
    match &replayed[0] {
        WalEntry::ExecutionPut(e) => assert_eq!(e.id, execution.id),
        other => panic!("unexpected entry: {other:?}"),
    }
}
