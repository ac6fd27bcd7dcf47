// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only durability log underlying the `ExecutionStore`.
//!
//! Every mutation to a persisted row is appended here before it is applied
//! to the in-memory materialized state ([`crate::state::StoreState`]), so a
//! crash mid-mutation always leaves a replayable log. This split (WAL +
//! in-memory materialized state fed by `apply`) is an implementation detail
//! entirely behind the store traits in [`crate::store`] — callers never see
//! a [`WalEntry`].

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use wfe_core::{ApprovalRequest, ContextCacheEntry, Event, Execution, StepExecution, Workflow, WorkflowSchedule};

use crate::error::WalError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WalEntry {
    WorkflowPut(Box<Workflow>),
    ExecutionPut(Box<Execution>),
    StepExecutionPut(Box<StepExecution>),
    ApprovalPut(Box<ApprovalRequest>),
    SchedulePut(Box<WorkflowSchedule>),
    CachePut(Box<ContextCacheEntry>),
    EventPut(Box<Event>),
}

pub trait Wal: Send + Sync {
    fn append(&self, entry: WalEntry) -> Result<(), WalError>;

    /// Replay every entry previously appended, in order. Used at startup to
    /// rebuild `StoreState` from a durable log.
    fn replay(&self) -> Result<Vec<WalEntry>, WalError>;
}

/// Non-durable WAL: entries only ever live in memory. The default for
/// tests and for `ExecutionStore::in_memory()`.
#[derive(Default)]
pub struct InMemoryWal {
    entries: Mutex<Vec<WalEntry>>,
}

impl InMemoryWal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Wal for InMemoryWal {
    fn append(&self, entry: WalEntry) -> Result<(), WalError> {
        self.entries.lock().push(entry);
        Ok(())
    }

    fn replay(&self) -> Result<Vec<WalEntry>, WalError> {
        Ok(self.entries.lock().clone())
    }
}

/// File-backed WAL: one JSON object per line, fsynced on every append.
pub struct FileWal {
    path: PathBuf,
    writer: Mutex<BufWriter<std::fs::File>>,
}

impl FileWal {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, WalError> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, writer: Mutex::new(BufWriter::new(file)) })
    }
}

impl Wal for FileWal {
    fn append(&self, entry: WalEntry) -> Result<(), WalError> {
        let mut line = serde_json::to_vec(&entry)?;
        line.push(b'\n');
        let mut writer = self.writer.lock();
        writer.write_all(&line)?;
        writer.flush()?;
        Ok(())
    }

    fn replay(&self) -> Result<Vec<WalEntry>, WalError> {
        let contents = std::fs::read_to_string(&self.path)?;
        contents
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| serde_json::from_str(line).map_err(WalError::from))
            .collect()
    }
}

pub type SharedWal = Arc<dyn Wal>;

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
