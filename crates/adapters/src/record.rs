// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::SinkError;

/// Adapter for structured writes against the host application's own record
/// store (orders, customers, tickets — whatever entity types the deployment
/// exposes). The engine never interprets `entity_type`; it is opaque routing
/// information for the sink.
#[async_trait]
pub trait RecordSink: Send + Sync + 'static {
    async fn create_record(&self, entity_type: &str, fields: &Map<String, Value>) -> Result<String, SinkError>;
    async fn update_record(&self, entity_type: &str, entity_id: &str, fields: &Map<String, Value>) -> Result<(), SinkError>;
}

/// Reference record sink: logs at info level and fabricates an id for
/// creates. Real deployments wire this to their own entity store.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingRecordSink;

#[async_trait]
impl RecordSink for LoggingRecordSink {
    async fn create_record(&self, entity_type: &str, fields: &Map<String, Value>) -> Result<String, SinkError> {
        let id = format!("{entity_type}-{}", nanoid::nanoid!(8));
        tracing::info!(%entity_type, %id, fields = %Value::Object(fields.clone()), "record created");
        Ok(id)
    }

    async fn update_record(&self, entity_type: &str, entity_id: &str, fields: &Map<String, Value>) -> Result<(), SinkError> {
        tracing::info!(%entity_type, %entity_id, fields = %Value::Object(fields.clone()), "record updated");
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{Map, RecordSink, SinkError, Value};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    pub enum RecordCall {
        Create { entity_type: String, fields: Map<String, Value> },
        Update { entity_type: String, entity_id: String, fields: Map<String, Value> },
    }

    #[derive(Clone, Default)]
    pub struct FakeRecordSink {
        calls: Arc<Mutex<Vec<RecordCall>>>,
        next_id: Arc<Mutex<u64>>,
    }

    impl FakeRecordSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<RecordCall> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl RecordSink for FakeRecordSink {
        async fn create_record(&self, entity_type: &str, fields: &Map<String, Value>) -> Result<String, SinkError> {
            let mut next_id = self.next_id.lock();
            *next_id += 1;
            let id = format!("{entity_type}-{next_id}");
            self.calls.lock().push(RecordCall::Create { entity_type: entity_type.to_string(), fields: fields.clone() });
            Ok(id)
        }

        async fn update_record(&self, entity_type: &str, entity_id: &str, fields: &Map<String, Value>) -> Result<(), SinkError> {
            self.calls.lock().push(RecordCall::Update {
                entity_type: entity_type.to_string(),
                entity_id: entity_id.to_string(),
                fields: fields.clone(),
            });
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRecordSink, RecordCall};

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
