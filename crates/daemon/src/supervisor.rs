// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon-level supervisor: composes the engine's four control loops
//! with the Broadcaster's dispatch task and the subscriber Listener's
//! accept loop under one shutdown sequence.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use wfe_adapters::{HttpSink, NotificationSink, RecordSink};
use wfe_core::Clock;
use wfe_engine::runtime::{RuntimeConfig, RuntimeDeps};

use crate::broadcaster::Broadcaster;
use crate::listener::Listener;

/// Owns every background task the daemon runs: the engine's control
/// loops, the Broadcaster's bus-to-subscriber dispatch loop, and the
/// Listener's connection-accept loop. Shutdown cancels the daemon-local
/// tasks first, then hands off to the engine supervisor's own shutdown
/// (which has its own independent cancellation token), then joins what's
/// left.
pub struct Supervisor {
    engine: wfe_engine::runtime::Supervisor,
    shutdown: CancellationToken,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl Supervisor {
    pub fn spawn<N, R, H, C>(runtime_config: RuntimeConfig, deps: RuntimeDeps<N, R, H, C>, broadcaster: Arc<Broadcaster>, listener: Listener) -> Self
    where
        N: NotificationSink + 'static,
        R: RecordSink + 'static,
        H: HttpSink + 'static,
        C: Clock + 'static,
    {
        let shutdown = CancellationToken::new();
        let engine = wfe_engine::runtime::Supervisor::spawn(runtime_config, deps);
        let dispatch = broadcaster.spawn_dispatch(shutdown.clone());
        let accept = listener.spawn(shutdown.clone());

        Self { engine, shutdown, handles: vec![dispatch, accept] }
    }

    /// Stop accepting connections and dispatching bus events, drain the
    /// engine's control loops, then join everything.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        self.engine.shutdown().await;
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}
