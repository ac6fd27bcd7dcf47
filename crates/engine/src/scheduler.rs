// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler: the periodic loop that fires cron-bound workflows.
//!
//! Cron-expression grammar and DST-aware timezone handling are pushed
//! behind the `CronSource` collaborator seam so the loop itself stays
//! independent of any one crate's grammar quirks.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use wfe_adapters::{HttpSink, MessageBus, NotificationSink, RecordSink};
use wfe_core::{Clock, WorkflowSchedule};
use wfe_storage::{ScheduleStore, WorkflowStore};

use crate::context::ContextBuilder;
use crate::error::EngineError;
use crate::interpreter::Interpreter;
use crate::launcher::ExecutionLauncher;

/// Computes the next fire time for a cron expression in a given
/// timezone. A seam so the grammar and DST handling can be swapped
/// without touching the loop.
pub trait CronSource: Send + Sync + 'static {
    /// Returns the next fire time, in epoch milliseconds, strictly after
    /// `after_ms`. `None` if the expression is malformed or has no future
    /// occurrence.
    fn next_after(&self, cron_expression: &str, timezone: &str, after_ms: u64) -> Option<u64>;
}

/// Reference `CronSource` backed by the `cron` crate's standard 5-field
/// (plus optional seconds) grammar, evaluated in the schedule's declared
/// timezone via `chrono-tz`.
#[derive(Default)]
pub struct ChronoCronSource;

impl CronSource for ChronoCronSource {
    fn next_after(&self, cron_expression: &str, timezone: &str, after_ms: u64) -> Option<u64> {
        use std::str::FromStr;

        let tz: chrono_tz::Tz = timezone.parse().ok()?;
        let schedule = cron::Schedule::from_str(cron_expression).ok()?;
        let after = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(after_ms as i64)?.with_timezone(&tz);
        let next = schedule.after(&after).next()?;
        Some(next.with_timezone(&chrono::Utc).timestamp_millis() as u64)
    }
}

pub struct Scheduler<N, R, H, C: Clock> {
    schedules: Arc<dyn ScheduleStore>,
    workflows: Arc<dyn WorkflowStore>,
    launcher: ExecutionLauncher<N, R, H, C>,
    cron: Arc<dyn CronSource>,
    clock: C,
    batch_size: usize,
}

impl<N, R, H, C> Scheduler<N, R, H, C>
where
    N: NotificationSink + 'static,
    R: RecordSink + 'static,
    H: HttpSink + 'static,
    C: Clock + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        schedules: Arc<dyn ScheduleStore>,
        workflows: Arc<dyn WorkflowStore>,
        executions: Arc<dyn wfe_storage::ExecutionStore>,
        context: ContextBuilder<C>,
        interpreter: Arc<Interpreter<N, R, H, C>>,
        bus: Arc<dyn MessageBus>,
        cron: Arc<dyn CronSource>,
        clock: C,
        batch_size: usize,
    ) -> Self {
        let launcher = ExecutionLauncher::new(executions, context, interpreter, bus, clock.clone());
        Self { schedules, workflows, launcher, cron, clock, batch_size }
    }

    pub fn spawn(self: Arc<Self>, interval: Duration, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(err) = self.tick().await {
                            tracing::warn!(error = %err, "scheduler tick failed");
                        }
                    }
                }
            }
        })
    }

    /// Fire one batch of due schedules. Returns how many workflows were
    /// launched.
    pub async fn tick(&self) -> Result<usize, EngineError> {
        let now_ms = self.clock.epoch_ms();
        let due = self.schedules.due(now_ms)?.into_iter().take(self.batch_size);
        let mut fired = 0;
        for schedule in due {
            if self.fire(&schedule, now_ms).await {
                fired += 1;
            }
        }
        Ok(fired)
    }

    async fn fire(&self, schedule: &WorkflowSchedule, now_ms: u64) -> bool {
        let workflow = match self.workflows.get_by_id(schedule.organization_id, schedule.workflow_id) {
            Ok(workflow) => workflow,
            Err(err) => {
                tracing::warn!(schedule_id = %schedule.id, error = %err, "scheduled workflow could not be loaded");
                return false;
            }
        };

        let trigger_payload = json!({
            "schedule_id": schedule.id,
            "trigger_type": "schedule",
            "cron_expression": schedule.cron_expression,
        });
        let execution_key = format!("{}-schedule-{}", workflow.workflow_key, now_ms);
        let launched = self
            .launcher
            .launch(&workflow, execution_key, "schedule.tick".to_string(), trigger_payload.clone(), &trigger_payload)
            .await;
        if let Err(err) = launched {
            tracing::warn!(schedule_id = %schedule.id, error = %err, "scheduled workflow failed to start; leaving next_trigger_at unchanged");
            return false;
        }

        self.advance(schedule, now_ms);
        true
    }

    fn advance(&self, schedule: &WorkflowSchedule, now_ms: u64) {
        let mut advanced = schedule.clone();
        advanced.last_triggered_at_ms = Some(now_ms);
        advanced.next_trigger_at_ms = self.cron.next_after(&schedule.cron_expression, &schedule.timezone, now_ms);
        if let Err(err) = self.schedules.put(advanced) {
            tracing::warn!(schedule_id = %schedule.id, error = %err, "failed to persist schedule's next trigger time");
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::CronSource;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// Test double that advances a fixed step on every call, independent
    /// of the cron expression's actual grammar.
    #[derive(Default)]
    pub struct FakeCronSource {
        step_ms: u64,
        overrides: Mutex<HashMap<String, u64>>,
    }

    impl FakeCronSource {
        pub fn new(step_ms: u64) -> Self {
            Self { step_ms, overrides: Mutex::new(HashMap::new()) }
        }
    }

    impl CronSource for FakeCronSource {
        fn next_after(&self, cron_expression: &str, _timezone: &str, after_ms: u64) -> Option<u64> {
            if let Some(&next) = self.overrides.lock().get(cron_expression) {
                return Some(next);
            }
            Some(after_ms + self.step_ms)
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeCronSource;

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
