// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("publish failed: {0}")]
    PublishFailed(String),
}

/// Cross-replica pub/sub channel used by the Broadcaster to fan subscriber
/// events out to every daemon process, not just the one that produced them.
/// Best-effort, at-most-once, no ordering guarantee across publishers —
/// exactly the semantics a lossy broadcast transport provides.
#[async_trait]
pub trait MessageBus: Send + Sync + 'static {
    async fn publish(&self, channel: &str, payload: Value) -> Result<(), BusError>;
    fn subscribe(&self) -> tokio::sync::broadcast::Receiver<(String, Value)>;
}

/// In-process message bus backed by a `tokio::sync::broadcast` channel.
/// Fans out within one daemon instance; a multi-replica deployment wires a
/// real transport (Redis, NATS) behind the same trait.
pub struct LocalMessageBus {
    sender: tokio::sync::broadcast::Sender<(String, Value)>,
}

impl LocalMessageBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = tokio::sync::broadcast::channel(capacity);
        Self { sender }
    }
}

impl Default for LocalMessageBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[async_trait]
impl MessageBus for LocalMessageBus {
    async fn publish(&self, channel: &str, payload: Value) -> Result<(), BusError> {
        // No subscribers is not an error — the bus is fire-and-forget.
        let _ = self.sender.send((channel.to_string(), payload));
        Ok(())
    }

    fn subscribe(&self) -> tokio::sync::broadcast::Receiver<(String, Value)> {
        self.sender.subscribe()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{BusError, MessageBus, Value};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone)]
    pub struct FakeMessageBus {
        published: Arc<Mutex<Vec<(String, Value)>>>,
        sender: tokio::sync::broadcast::Sender<(String, Value)>,
    }

    impl Default for FakeMessageBus {
        fn default() -> Self {
            let (sender, _) = tokio::sync::broadcast::channel(256);
            Self { published: Arc::new(Mutex::new(Vec::new())), sender }
        }
    }

    impl FakeMessageBus {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn published(&self) -> Vec<(String, Value)> {
            self.published.lock().clone()
        }
    }

    #[async_trait]
    impl MessageBus for FakeMessageBus {
        async fn publish(&self, channel: &str, payload: Value) -> Result<(), BusError> {
            self.published.lock().push((channel.to_string(), payload.clone()));
            let _ = self.sender.send((channel.to_string(), payload));
            Ok(())
        }

        fn subscribe(&self) -> tokio::sync::broadcast::Receiver<(String, Value)> {
            self.sender.subscribe()
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeMessageBus;

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
