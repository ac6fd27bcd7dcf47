// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;

use crate::error::SinkError;

/// Adapter for sending notifications to named recipients or channels.
/// `recipients` are opaque to the sink (an email address, a Slack channel
/// id, a pager key) — resolving them is the sink's business.
#[async_trait]
pub trait NotificationSink: Send + Sync + 'static {
    async fn send(&self, recipients: &[String], subject: &str, body: &str) -> Result<(), SinkError>;
}

/// Reference notification sink: logs at info level instead of reaching an
/// external transport. Deployments that need real delivery (email, Slack,
/// pager) supply their own `NotificationSink`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingNotificationSink;

#[async_trait]
impl NotificationSink for LoggingNotificationSink {
    async fn send(&self, recipients: &[String], subject: &str, body: &str) -> Result<(), SinkError> {
        tracing::info!(recipients = ?recipients, %subject, %body, "notification sent");
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{NotificationSink, SinkError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    pub struct NotifyCall {
        pub recipients: Vec<String>,
        pub subject: String,
        pub body: String,
    }

    #[derive(Clone, Default)]
    pub struct FakeNotificationSink {
        calls: Arc<Mutex<Vec<NotifyCall>>>,
    }

    impl FakeNotificationSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<NotifyCall> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl NotificationSink for FakeNotificationSink {
        async fn send(&self, recipients: &[String], subject: &str, body: &str) -> Result<(), SinkError> {
            self.calls.lock().push(NotifyCall {
                recipients: recipients.to_vec(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNotificationSink, NotifyCall};

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
