// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness for workspace-level specs: a temporary state directory
//! and a handle on a spawned `wfed` process.

use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::time::{Duration, Instant};

use assert_cmd::cargo::cargo_bin;

/// Poll `predicate` every 20ms until it returns true or `max_ms` elapses.
pub fn wait_for(max_ms: u64, mut predicate: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    loop {
        if predicate() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

pub const SPEC_WAIT_MAX_MS: u64 = 5_000;

/// A temporary `WFE_STATE_DIR` for one spec, cleaned up on drop.
pub struct TempState {
    dir: tempfile::TempDir,
}

impl TempState {
    pub fn new() -> Self {
        Self { dir: tempfile::tempdir().expect("tempdir") }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn socket_path(&self) -> PathBuf {
        self.dir.path().join("wfed.sock")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.dir.path().join("wfed.pid")
    }

    /// Build a `wfe` command rooted at this state directory.
    pub fn wfe(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("wfe"));
        cmd.env("WFE_STATE_DIR", self.dir.path());
        cmd
    }

    /// Spawn `wfed` against this state directory without waiting on it.
    pub fn spawn_daemon(&self) -> DaemonHandle {
        let child = Command::new(cargo_bin("wfed")).env("WFE_STATE_DIR", self.dir.path()).spawn().expect("spawn wfed");
        DaemonHandle { child }
    }
}

/// A running (or exited) `wfed` child process. SIGKILLs on drop so a
/// failing assertion never leaves a daemon behind holding the lock file.
pub struct DaemonHandle {
    child: Child,
}

impl DaemonHandle {
    /// `None` while still running, `Some(status)` once it has exited
    /// (checked without blocking).
    pub fn try_exit_code(&mut self) -> Option<i32> {
        self.child.try_wait().ok().flatten().and_then(|status| status.code())
    }
}

impl Drop for DaemonHandle {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
