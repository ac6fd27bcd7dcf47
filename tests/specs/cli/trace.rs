// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wfe trace` reads the `ExecutionStore` directly; no daemon required.
//!
//! Seeding a real execution needs a registered workflow, and workflow
//! CRUD is an HTTP collaborator this crate doesn't implement (see
//! DESIGN.md), so these specs cover the store-miss path rather than a
//! full trigger-to-completion trace.

use crate::support::TempState;

#[test]
fn trace_of_an_unknown_execution_fails() {
    let state = TempState::new();

    let output = state
        .wfe()
        .args([
            "trace",
            "--organization-id",
            "00000000-0000-0000-0000-000000000001",
            "--execution-id",
            "11111111-1111-1111-1111-111111111111",
        ])
        .output()
        .expect("run wfe trace");

    assert!(!output.status.success(), "tracing a nonexistent execution should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.to_lowercase().contains("not found") || stderr.to_lowercase().contains("error"), "unexpected stderr: {stderr}");
}
