// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Error raised by any sink adapter. Never retried by the caller — retry
/// policy, if any, belongs inside the sink implementation itself.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("unreachable: {0}")]
    Unreachable(String),
}
