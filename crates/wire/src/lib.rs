// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscriber wire protocol for the workflow engine daemon.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod channel;
mod filter;
mod message;
mod wire;

pub use channel::{execution as execution_channel, workflow as workflow_channel, APPROVALS, EXECUTIONS};
pub use filter::SubscriptionFilters;
pub use message::{ClientMessage, ServerMessage};
pub use wire::{decode, encode, read_client_message, read_message, write_message, write_server_message, ProtocolError, MAX_MESSAGE_BYTES};
