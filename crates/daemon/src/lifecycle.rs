// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup: state directory layout, the exclusive lock file that
//! keeps two daemons from sharing one WAL, and WAL recovery.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use fs2::FileExt;
use thiserror::Error;
use wfe_storage::{FileWal, SharedWal, Storage, StoreError};

use crate::env;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("could not determine a state directory (set WFE_STATE_DIR or HOME)")]
    NoStateDir,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("another daemon already holds the lock at {0:?}: {1}")]
    LockFailed(PathBuf, std::io::Error),
    #[error("WAL error: {0}")]
    Wal(#[from] wfe_storage::WalError),
    #[error("store recovery failed: {0}")]
    Store(#[from] StoreError),
}

/// Resolved on-disk paths for one daemon instance.
#[derive(Debug, Clone)]
pub struct Paths {
    pub state_dir: PathBuf,
    pub socket_path: PathBuf,
    pub lock_path: PathBuf,
    pub wal_path: PathBuf,
}

impl Paths {
    pub fn resolve() -> Result<Self, LifecycleError> {
        let state_dir = env::state_dir()?;
        Ok(Self {
            socket_path: state_dir.join("wfed.sock"),
            lock_path: state_dir.join("wfed.pid"),
            wal_path: state_dir.join("wal").join("wfe.wal"),
            state_dir,
        })
    }
}

/// Holds the exclusive lock for the lifetime of the daemon process; the
/// lock is released when this value (and the underlying `File`) drops.
pub struct DaemonLock {
    #[allow(dead_code)]
    file: File,
}

fn acquire_lock(paths: &Paths) -> Result<DaemonLock, LifecycleError> {
    std::fs::create_dir_all(&paths.state_dir)?;
    let mut file = std::fs::OpenOptions::new().write(true).create(true).truncate(false).open(&paths.lock_path)?;
    file.try_lock_exclusive().map_err(|e| LifecycleError::LockFailed(paths.lock_path.clone(), e))?;
    file.set_len(0)?;
    writeln!(file, "{}", std::process::id())?;
    Ok(DaemonLock { file })
}

/// Result of a successful startup: the lock (keep alive for the process
/// lifetime), the resolved paths, and the recovered store.
pub struct Started {
    pub lock: DaemonLock,
    pub paths: Paths,
    pub storage: Arc<Storage>,
}

/// Acquire the exclusive lock, open (or create) the WAL, and replay it
/// into a fresh `Storage`. Mirrors the teacher's own startup ordering:
/// lock first (so a second daemon fails fast), directories second, WAL
/// replay third, socket bind last.
pub fn startup() -> Result<Started, LifecycleError> {
    let paths = Paths::resolve()?;
    let lock = acquire_lock(&paths)?;

    if let Some(parent) = paths.wal_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let wal: SharedWal = Arc::new(FileWal::open(&paths.wal_path)?);
    let storage = Arc::new(Storage::new(wal));
    storage.recover()?;

    Ok(Started { lock, paths, storage })
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
