// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `WorkflowSchedule`: a cron-bound trigger owned by the scheduler control loop.

use serde::{Deserialize, Serialize};

use crate::ids::{OrganizationId, ScheduleId, WorkflowId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSchedule {
    pub id: ScheduleId,
    pub organization_id: OrganizationId,
    pub workflow_id: WorkflowId,
    pub cron_expression: String,
    pub timezone: String,
    pub enabled: bool,
    pub last_triggered_at_ms: Option<u64>,
    pub next_trigger_at_ms: Option<u64>,
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct WorkflowScheduleBuilder => WorkflowSchedule {
        computed { id: ScheduleId = ScheduleId::new() }
        computed { organization_id: OrganizationId = OrganizationId::new() }
        computed { workflow_id: WorkflowId = WorkflowId::new() }
        into { cron_expression: String = "0 * * * * *" }
        into { timezone: String = "UTC" }
        set { enabled: bool = true }
        option { last_triggered_at_ms: u64 = None }
        option { next_trigger_at_ms: u64 = None }
    }
}
