// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error kinds raised while evaluating or persisting workflow state.

use thiserror::Error;

/// Errors raised by the condition evaluator ([`crate::evaluator`]).
///
/// These are only raised for structurally invalid expressions; a missing or
/// mistyped context field is never an error, it just evaluates to `false`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("condition leaf missing required field")]
    MissingField,

    #[error("logical NOT requires exactly one child condition, got {0}")]
    NotArity(usize),

    #[error("logical op requires at least one child condition")]
    EmptyCompound,

    #[error("invalid regex pattern: {0}")]
    InvalidRegex(String),
}

/// Errors raised while validating a workflow definition before it is stored
/// or before an execution of it is started.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowValidationError {
    #[error("workflow has no steps")]
    NoSteps,

    #[error("duplicate step id: {0}")]
    DuplicateStepId(String),

    #[error("step {step} references unknown step id: {target}")]
    UnknownStepReference { step: String, target: String },

    #[error("step type `{0}` is reserved and not executable")]
    ReservedStepType(String),

    #[error("condition error in step {step}: {source}")]
    Condition { step: String, source: EvalError },
}
