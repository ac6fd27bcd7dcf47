// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wfed` — the workflow engine daemon binary. Recovers the WAL-backed
//! store, spawns the control loops and the subscriber Listener/
//! Broadcaster, and runs until it receives a shutdown signal.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use wfe_adapters::{LocalMessageBus, LoggingNotificationSink, LoggingRecordSink, ReqwestHttpSink};
use wfe_core::SystemClock;
use wfe_daemon::{config::DaemonConfig, env, lifecycle, Broadcaster, ListenCtx, Listener, Supervisor};
use wfe_engine::{ActionExecutor, ApprovalCoordinator, ChronoCronSource, ContextBuilder, Interpreter};
use wfe_engine::runtime::RuntimeDeps;

/// TTL for cached context-enrichment fragments. No enrichment sources are
/// wired in by default — this crate doesn't know what external systems a
/// deployment wants workflows to pull context from — so the value only
/// matters once a deployment adds its own `ContextEnricher`s.
const CONTEXT_CACHE_TTL_MS: u64 = 60_000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let started = lifecycle::startup()?;
    let config = DaemonConfig::load(env::config_path().as_deref())?;
    tracing::info!(socket = ?started.paths.socket_path, tcp_port = ?config.tcp_port, "wfed starting");

    let storage = started.storage.clone();
    let clock = SystemClock;
    let bus: Arc<dyn wfe_adapters::MessageBus> = Arc::new(LocalMessageBus::default());

    let context = ContextBuilder::new(vec![], storage.clone(), clock.clone(), CONTEXT_CACHE_TTL_MS);
    let actions = ActionExecutor::new(LoggingNotificationSink, LoggingRecordSink, ReqwestHttpSink::default());
    let interpreter_approvals = ApprovalCoordinator::new(storage.clone(), storage.clone(), bus.clone(), clock.clone());
    let interpreter = Arc::new(Interpreter::new(actions, interpreter_approvals, storage.clone(), bus.clone(), clock.clone()));
    let runtime_approvals = Arc::new(ApprovalCoordinator::new(storage.clone(), storage.clone(), bus.clone(), clock.clone()));
    let cron: Arc<dyn wfe_engine::CronSource> = Arc::new(ChronoCronSource);

    let deps = RuntimeDeps {
        executions: storage.clone(),
        workflows: storage.clone(),
        schedules: storage.clone(),
        context,
        interpreter,
        approvals: runtime_approvals,
        bus: bus.clone(),
        cron,
        clock,
    };

    let broadcaster = Broadcaster::new(bus);
    let listen_ctx = Arc::new(ListenCtx { broadcaster: broadcaster.clone(), auth_token: config.auth_token.clone() });
    let listener = Listener::bind(&started.paths.socket_path, config.tcp_port, listen_ctx)?;

    let supervisor = Supervisor::spawn(config.runtime.clone(), deps, broadcaster, listener);

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received, draining");
    supervisor.shutdown().await;
    drop(started.lock);

    Ok(())
}
