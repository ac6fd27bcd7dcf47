// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed identifiers for every persisted entity.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

crate::define_id! {
    /// Identifies a workflow definition (stable across versions).
    pub struct WorkflowId("wfl-");
}

crate::define_id! {
    /// Identifies a single step-execution attempt within an execution's trace.
    pub struct StepExecutionId("stx-");
}

crate::define_id! {
    /// Identifies an approval request spawned by a `require_approval` action.
    pub struct ApprovalRequestId("apr-");
}

crate::define_id! {
    /// Identifies an ingested trigger event.
    pub struct EventId("evt-");
}

crate::define_id! {
    /// Identifies a cron-driven workflow schedule.
    pub struct ScheduleId("sch-");
}

/// Identifies a single execution. Backed by a UUID rather than the
/// nanoid-based `IdBuf` scheme, since executions are addressed externally
/// (API responses, broadcaster payloads) and UUID is the contract clients
/// expect there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionId(pub Uuid);

impl ExecutionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ExecutionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Identifies the tenant boundary. Every persisted row carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationId(pub Uuid);

impl OrganizationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrganizationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for OrganizationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
