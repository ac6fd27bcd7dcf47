// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Event`: an ingested trigger that the event router matches against
//! enabled workflows.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::{EventId, ExecutionId, OrganizationId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub organization_id: OrganizationId,
    pub event_type: String,
    pub source: String,
    pub payload: Value,
    pub triggered_executions: Vec<ExecutionId>,
    pub received_at_ms: u64,
    pub processed_at_ms: Option<u64>,
}

impl Event {
    pub fn new(
        organization_id: OrganizationId,
        event_type: impl Into<String>,
        source: impl Into<String>,
        payload: Value,
        now_ms: u64,
    ) -> Self {
        Self {
            id: EventId::new(),
            organization_id,
            event_type: event_type.into(),
            source: source.into(),
            payload,
            triggered_executions: Vec::new(),
            received_at_ms: now_ms,
            processed_at_ms: None,
        }
    }

    pub fn mark_processed(&mut self, triggered: Vec<ExecutionId>, now_ms: u64) {
        self.triggered_executions = triggered;
        self.processed_at_ms = Some(now_ms);
    }
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct EventBuilder => Event {
        computed { id: EventId = EventId::new() }
        set { organization_id: OrganizationId = OrganizationId::new() }
        into { event_type: String = "order.created" }
        into { source: String = "storefront" }
        set { payload: Value = Value::Object(Default::default()) }
        computed { triggered_executions: Vec<ExecutionId> = Vec::new() }
        set { received_at_ms: u64 = 0 }
        option { processed_at_ms: u64 = None }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
