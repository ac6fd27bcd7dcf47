// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires the four control loops (Resumer, TimeoutEnforcer, Scheduler,
//! ApprovalExpirer) together behind one shared shutdown signal. The
//! daemon's own supervisor composes this one with the Broadcaster's
//! listener task.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use wfe_adapters::{HttpSink, MessageBus, NotificationSink, RecordSink};
use wfe_core::Clock;
use wfe_storage::{ExecutionStore, ScheduleStore, WorkflowStore};

use crate::approval_coordinator::ApprovalCoordinator;
use crate::approval_expirer::ApprovalExpirer;
use crate::context::ContextBuilder;
use crate::interpreter::Interpreter;
use crate::resumer::Resumer;
use crate::scheduler::{CronSource, Scheduler};
use crate::timeout_enforcer::TimeoutEnforcer;

/// Tick intervals and per-tick batch sizes for the control loops. Defaults
/// match the values named in the design doc.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub resumer_interval: Duration,
    pub resumer_batch_size: usize,
    pub timeout_interval: Duration,
    pub timeout_batch_size: usize,
    pub scheduler_interval: Duration,
    pub scheduler_batch_size: usize,
    pub approval_expiry_interval: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            resumer_interval: Duration::from_secs(60),
            resumer_batch_size: 100,
            timeout_interval: Duration::from_secs(30),
            timeout_batch_size: 100,
            scheduler_interval: Duration::from_secs(30),
            scheduler_batch_size: 100,
            approval_expiry_interval: Duration::from_secs(60),
        }
    }
}

/// Dependencies shared by every control loop. Generalizes the teacher's
/// `RuntimeDeps<S, A>` with the extra type parameter this engine's
/// three-sink `ActionExecutor` needs.
pub struct RuntimeDeps<N, R, H, C: Clock> {
    pub executions: Arc<dyn ExecutionStore>,
    pub workflows: Arc<dyn WorkflowStore>,
    pub schedules: Arc<dyn ScheduleStore>,
    pub context: ContextBuilder<C>,
    pub interpreter: Arc<Interpreter<N, R, H, C>>,
    pub approvals: Arc<ApprovalCoordinator<C>>,
    pub bus: Arc<dyn MessageBus>,
    pub cron: Arc<dyn CronSource>,
    pub clock: C,
}

/// Owns the four control-loop tasks and joins them on shutdown.
pub struct Supervisor {
    shutdown: CancellationToken,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl Supervisor {
    pub fn spawn<N, R, H, C>(config: RuntimeConfig, deps: RuntimeDeps<N, R, H, C>) -> Self
    where
        N: NotificationSink + 'static,
        R: RecordSink + 'static,
        H: HttpSink + 'static,
        C: Clock + 'static,
    {
        let shutdown = CancellationToken::new();

        let resumer = Arc::new(Resumer::new(
            deps.executions.clone(),
            deps.workflows.clone(),
            deps.interpreter.clone(),
            deps.bus.clone(),
            deps.clock.clone(),
            config.resumer_batch_size,
        ));
        let timeout_enforcer =
            Arc::new(TimeoutEnforcer::new(deps.executions.clone(), deps.bus.clone(), deps.clock.clone(), config.timeout_batch_size));
        let scheduler = Arc::new(Scheduler::new(
            deps.schedules,
            deps.workflows,
            deps.executions,
            deps.context,
            deps.interpreter,
            deps.bus,
            deps.cron,
            deps.clock,
            config.scheduler_batch_size,
        ));
        let expirer = Arc::new(ApprovalExpirer::new(deps.approvals));

        let handles = vec![
            resumer.spawn(config.resumer_interval, shutdown.clone()),
            timeout_enforcer.spawn(config.timeout_interval, shutdown.clone()),
            scheduler.spawn(config.scheduler_interval, shutdown.clone()),
            expirer.spawn(config.approval_expiry_interval, shutdown.clone()),
        ];

        Self { shutdown, handles }
    }

    /// Signal every loop to stop and wait for them to drain their current
    /// tick.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        for handle in self.handles.drain(..) {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
