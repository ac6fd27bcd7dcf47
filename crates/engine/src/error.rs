// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;
use wfe_adapters::SinkError;
use wfe_core::error::{EvalError, WorkflowValidationError};
use wfe_storage::StoreError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("action error: {0}")]
    Action(#[from] ActionError),
    #[error("evaluator error: {0}")]
    Eval(#[from] EvalError),
    #[error("invalid workflow: {0}")]
    InvalidWorkflow(#[from] WorkflowValidationError),
    #[error("context build failed for source '{source}': {cause}")]
    Build { source: String, cause: String },
    #[error("unknown step: {0}")]
    UnknownStep(String),
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("unresolved template path '{0}'")]
    UnresolvedPath(String),
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),
    #[error("missing field '{0}' in action spec")]
    MissingField(String),
}
