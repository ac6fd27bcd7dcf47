// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup/shutdown: the exclusive lock and the subscriber socket.

use crate::support::{wait_for, TempState, SPEC_WAIT_MAX_MS};

#[test]
fn daemon_creates_socket_on_startup() {
    let state = TempState::new();
    let mut daemon = state.spawn_daemon();

    let socket_path = state.socket_path();
    let came_up = wait_for(SPEC_WAIT_MAX_MS, || socket_path.exists());
    assert!(came_up, "wfed never created its socket at {socket_path:?}");
    assert_eq!(daemon.try_exit_code(), None, "wfed exited instead of serving");
}

#[test]
fn second_daemon_refuses_to_start_while_the_first_holds_the_lock() {
    let state = TempState::new();
    let mut first = state.spawn_daemon();

    let socket_path = state.socket_path();
    assert!(wait_for(SPEC_WAIT_MAX_MS, || socket_path.exists()), "first wfed never came up");

    let mut second = state.spawn_daemon();
    let exited = wait_for(SPEC_WAIT_MAX_MS, || second.try_exit_code().is_some());
    assert!(exited, "second wfed should have exited immediately on a lock conflict");
    assert_ne!(second.try_exit_code(), Some(0), "second wfed should have failed, not succeeded");

    assert_eq!(first.try_exit_code(), None, "first wfed should still be serving");
}
