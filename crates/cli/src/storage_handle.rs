// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opens the same on-disk WAL the daemon uses, without taking its
//! exclusive lock. Only safe to use from a short-lived one-shot command
//! (`submit-event`, `trace`) run against a quiescent store — it is not a
//! second writer coordinating with a live daemon.

use std::sync::Arc;

use wfe_daemon::lifecycle::Paths;
use wfe_storage::{FileWal, SharedWal, Storage};

pub fn open() -> anyhow::Result<Arc<Storage>> {
    let paths = Paths::resolve().map_err(|e| anyhow::anyhow!("resolving state directory: {e}"))?;
    if let Some(parent) = paths.wal_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let wal: SharedWal = Arc::new(FileWal::open(&paths.wal_path)?);
    let storage = Arc::new(Storage::new(wal));
    storage.recover()?;
    Ok(storage)
}

pub fn socket_path() -> anyhow::Result<std::path::PathBuf> {
    let paths = Paths::resolve().map_err(|e| anyhow::anyhow!("resolving state directory: {e}"))?;
    Ok(paths.socket_path)
}
