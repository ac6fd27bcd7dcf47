// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscriber protocol messages. Client frames flow daemon-ward
//! (`subscribe`/`unsubscribe`/`ping`); server frames flow client-ward
//! (acks, `pong`, `error`, and the `execution.*`/`step.*`/`approval.*`
//! event stream).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::filter::SubscriptionFilters;

/// A frame sent by a subscriber to the daemon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Required as the first frame on a TCP connection when the daemon has
    /// an auth token configured; unused (and unnecessary) on the Unix
    /// socket, which is trusted by virtue of filesystem permissions.
    #[serde(rename = "hello")]
    Hello {
        #[serde(default)]
        token: Option<String>,
    },

    #[serde(rename = "subscribe")]
    Subscribe {
        channel: String,
        #[serde(default)]
        filters: SubscriptionFilters,
    },

    #[serde(rename = "unsubscribe")]
    Unsubscribe { channel: String },

    #[serde(rename = "ping")]
    Ping,
}

/// A frame sent by the daemon to a subscriber.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "pong")]
    Pong,

    #[serde(rename = "subscribed")]
    Subscribed { channel: String },

    #[serde(rename = "unsubscribed")]
    Unsubscribed { channel: String },

    #[serde(rename = "error")]
    Error { code: String, message: String },

    #[serde(rename = "execution.created")]
    ExecutionCreated { timestamp: DateTime<Utc>, data: Value },
    #[serde(rename = "execution.started")]
    ExecutionStarted { timestamp: DateTime<Utc>, data: Value },
    #[serde(rename = "execution.completed")]
    ExecutionCompleted { timestamp: DateTime<Utc>, data: Value },
    #[serde(rename = "execution.failed")]
    ExecutionFailed { timestamp: DateTime<Utc>, data: Value },
    #[serde(rename = "execution.paused")]
    ExecutionPaused { timestamp: DateTime<Utc>, data: Value },
    #[serde(rename = "execution.resumed")]
    ExecutionResumed { timestamp: DateTime<Utc>, data: Value },
    #[serde(rename = "execution.cancelled")]
    ExecutionCancelled { timestamp: DateTime<Utc>, data: Value },
    #[serde(rename = "execution.blocked")]
    ExecutionBlocked { timestamp: DateTime<Utc>, data: Value },

    #[serde(rename = "step.started")]
    StepStarted { timestamp: DateTime<Utc>, data: Value },
    #[serde(rename = "step.completed")]
    StepCompleted { timestamp: DateTime<Utc>, data: Value },
    #[serde(rename = "step.failed")]
    StepFailed { timestamp: DateTime<Utc>, data: Value },
    #[serde(rename = "step.skipped")]
    StepSkipped { timestamp: DateTime<Utc>, data: Value },

    #[serde(rename = "approval.required")]
    ApprovalRequired { timestamp: DateTime<Utc>, data: Value },
    #[serde(rename = "approval.granted")]
    ApprovalGranted { timestamp: DateTime<Utc>, data: Value },
    #[serde(rename = "approval.denied")]
    ApprovalDenied { timestamp: DateTime<Utc>, data: Value },
    #[serde(rename = "approval.expired")]
    ApprovalExpired { timestamp: DateTime<Utc>, data: Value },
}

impl ServerMessage {
    /// The channel-naming convention this message's event type maps to, per
    /// the broadcaster's channel scheme (`executions`, `executions:{id}`,
    /// `workflows:{id}`, `approvals`). Returns `None` for control frames,
    /// which aren't published on any channel.
    pub fn default_channel(&self) -> Option<&'static str> {
        match self {
            ServerMessage::ExecutionCreated { .. }
            | ServerMessage::ExecutionStarted { .. }
            | ServerMessage::ExecutionCompleted { .. }
            | ServerMessage::ExecutionFailed { .. }
            | ServerMessage::ExecutionPaused { .. }
            | ServerMessage::ExecutionResumed { .. }
            | ServerMessage::ExecutionCancelled { .. }
            | ServerMessage::ExecutionBlocked { .. }
            | ServerMessage::StepStarted { .. }
            | ServerMessage::StepCompleted { .. }
            | ServerMessage::StepFailed { .. }
            | ServerMessage::StepSkipped { .. } => Some("executions"),
            ServerMessage::ApprovalRequired { .. }
            | ServerMessage::ApprovalGranted { .. }
            | ServerMessage::ApprovalDenied { .. }
            | ServerMessage::ApprovalExpired { .. } => Some("approvals"),
            ServerMessage::Pong | ServerMessage::Subscribed { .. } | ServerMessage::Unsubscribed { .. } | ServerMessage::Error { .. } => {
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
