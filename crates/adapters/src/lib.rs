// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wfe-adapters: sinks the engine dispatches actions to. Each trait has a
//! logging reference implementation plus a `Fake*` implementation gated
//! behind `#[cfg(any(test, feature = "test-support"))]` for use in engine
//! tests without reaching a real transport.

pub mod bus;
pub mod error;
pub mod http;
pub mod notify;
pub mod record;

pub use bus::{BusError, LocalMessageBus, MessageBus};
pub use error::SinkError;
pub use http::{HttpSink, ReqwestHttpSink};
pub use notify::{LoggingNotificationSink, NotificationSink};
pub use record::{LoggingRecordSink, RecordSink};

#[cfg(any(test, feature = "test-support"))]
pub use bus::FakeMessageBus;
#[cfg(any(test, feature = "test-support"))]
pub use http::FakeHttpSink;
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotificationSink;
#[cfg(any(test, feature = "test-support"))]
pub use record::FakeRecordSink;
