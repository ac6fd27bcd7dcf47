// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error kinds surfaced by the storage layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("organization mismatch")]
    OrganizationMismatch,

    #[error("conflict: expected status {expected}, found {actual}")]
    Conflict { expected: String, actual: String },

    #[error("wal append failed: {0}")]
    Wal(#[from] WalError),

    #[error("persistence error: {0}")]
    Persistence(String),
}

#[derive(Debug, Error)]
pub enum WalError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
