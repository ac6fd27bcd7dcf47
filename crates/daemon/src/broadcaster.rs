// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Broadcaster: local fan-out of execution/step/approval events to
//! connected subscribers, bridged across replicas by the shared
//! `MessageBus`.
//!
//! The control loops in `wfe-engine` already publish onto the bus, which
//! is itself the cross-replica fan-out primitive — so the Broadcaster
//! only needs to *subscribe* to it and hand matching messages to local
//! connections. It never publishes back onto the bus, which is what
//! keeps a multi-replica deployment from re-broadcasting the same event
//! in a loop.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use wfe_adapters::MessageBus;
use wfe_core::{ExecutionId, WorkflowId};
use wfe_wire::{ServerMessage, SubscriptionFilters};

/// A connected subscriber's outbound queue is bounded; a subscriber that
/// can't keep up is disconnected rather than allowed to build unbounded
/// backlog.
const OUTBOUND_QUEUE_CAPACITY: usize = 256;

pub type SubscriberId = u64;

struct Registration {
    tx: mpsc::Sender<ServerMessage>,
    subscriptions: Mutex<Vec<(String, SubscriptionFilters)>>,
}

/// Handle returned by `Broadcaster::register`. The listener uses this to
/// apply `subscribe`/`unsubscribe` requests and to receive the connection's
/// outbound queue; dropping it deregisters the connection.
pub struct SubscriberHandle {
    id: SubscriberId,
    broadcaster: Arc<Broadcaster>,
    pub rx: mpsc::Receiver<ServerMessage>,
}

impl SubscriberHandle {
    pub fn subscribe(&self, channel: String, filters: SubscriptionFilters) {
        self.broadcaster.subscribe(self.id, channel, filters);
    }

    pub fn unsubscribe(&self, channel: &str) {
        self.broadcaster.unsubscribe(self.id, channel);
    }
}

impl Drop for SubscriberHandle {
    fn drop(&mut self) {
        self.broadcaster.deregister(self.id);
    }
}

pub struct Broadcaster {
    bus: Arc<dyn MessageBus>,
    registrations: Mutex<HashMap<SubscriberId, Arc<Registration>>>,
    next_id: AtomicU64,
}

impl Broadcaster {
    pub fn new(bus: Arc<dyn MessageBus>) -> Arc<Self> {
        Arc::new(Self { bus, registrations: Mutex::new(HashMap::new()), next_id: AtomicU64::new(1) })
    }

    /// Register a new connection. Returns a handle the listener holds for
    /// the lifetime of the connection.
    pub fn register(self: &Arc<Self>) -> SubscriberHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        let registration = Arc::new(Registration { tx, subscriptions: Mutex::new(Vec::new()) });
        self.registrations.lock().insert(id, registration);
        SubscriberHandle { id, broadcaster: self.clone(), rx }
    }

    fn subscribe(&self, id: SubscriberId, channel: String, filters: SubscriptionFilters) {
        if let Some(reg) = self.registrations.lock().get(&id) {
            let mut subs = reg.subscriptions.lock();
            subs.retain(|(c, _)| c != &channel);
            subs.push((channel, filters));
        }
    }

    fn unsubscribe(&self, id: SubscriberId, channel: &str) {
        if let Some(reg) = self.registrations.lock().get(&id) {
            reg.subscriptions.lock().retain(|(c, _)| c != channel);
        }
    }

    fn deregister(&self, id: SubscriberId) {
        self.registrations.lock().remove(&id);
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.registrations.lock().len()
    }

    /// Spawn the dispatch loop: reads the bus, matches against every
    /// registered connection's subscriptions, and forwards. A subscriber
    /// whose outbound queue is full is dropped — best-effort, at-most-once
    /// delivery, no replay.
    pub fn spawn_dispatch(self: Arc<Self>, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut rx = self.bus.subscribe();
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    received = rx.recv() => {
                        match received {
                            Ok((channel, payload)) => self.dispatch(&channel, payload).await,
                            Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                                tracing::warn!(skipped, "broadcaster dispatch loop lagged behind the bus");
                            }
                            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                        }
                    }
                }
            }
        })
    }

    async fn dispatch(&self, channel: &str, payload: Value) {
        let Some(message) = to_server_message(&payload) else {
            tracing::warn!(channel, "broadcaster received a payload it couldn't translate to a wire message");
            return;
        };

        let workflow_id = payload.get("workflow_id").and_then(|v| serde_json::from_value::<WorkflowId>(v.clone()).ok());
        let execution_id = payload.get("execution_id").and_then(|v| serde_json::from_value::<ExecutionId>(v.clone()).ok());
        let status = payload.get("status").and_then(Value::as_str).unwrap_or("");

        let registrations: Vec<Arc<Registration>> = self.registrations.lock().values().cloned().collect();
        for reg in registrations {
            let matched = {
                let subs = reg.subscriptions.lock();
                subs.iter().any(|(sub_channel, filters)| sub_channel == channel && filter_matches(filters, workflow_id, execution_id, status))
            };
            if matched && reg.tx.try_send(message.clone()).is_err() {
                tracing::debug!("dropping a subscriber whose outbound queue is full");
            }
        }
    }
}

fn filter_matches(filters: &SubscriptionFilters, workflow_id: Option<WorkflowId>, execution_id: Option<ExecutionId>, status: &str) -> bool {
    // Missing workflow_id/execution_id on the payload only fails the check
    // if the subscriber actually filters on that field.
    let workflow_ok = filters.workflow_ids.is_empty() || workflow_id.is_some_and(|w| filters.workflow_ids.contains(&w));
    let execution_ok = filters.execution_ids.is_empty() || execution_id.is_some_and(|e| filters.execution_ids.contains(&e));
    let status_ok = filters.statuses.is_empty() || filters.statuses.iter().any(|s| s == status);
    workflow_ok && execution_ok && status_ok
}

fn to_server_message(payload: &Value) -> Option<ServerMessage> {
    let event_type = payload.get("type").and_then(Value::as_str)?;
    let timestamp = Utc::now();
    let data = payload.clone();
    Some(match event_type {
        "execution.created" => ServerMessage::ExecutionCreated { timestamp, data },
        "execution.started" => ServerMessage::ExecutionStarted { timestamp, data },
        "execution.completed" => ServerMessage::ExecutionCompleted { timestamp, data },
        "execution.failed" => ServerMessage::ExecutionFailed { timestamp, data },
        "execution.paused" => ServerMessage::ExecutionPaused { timestamp, data },
        "execution.resumed" => ServerMessage::ExecutionResumed { timestamp, data },
        "execution.cancelled" => ServerMessage::ExecutionCancelled { timestamp, data },
        "execution.blocked" => ServerMessage::ExecutionBlocked { timestamp, data },
        "step.started" => ServerMessage::StepStarted { timestamp, data },
        "step.completed" => ServerMessage::StepCompleted { timestamp, data },
        "step.failed" => ServerMessage::StepFailed { timestamp, data },
        "step.skipped" => ServerMessage::StepSkipped { timestamp, data },
        "approval.required" => ServerMessage::ApprovalRequired { timestamp, data },
        "approval.granted" => ServerMessage::ApprovalGranted { timestamp, data },
        "approval.denied" => ServerMessage::ApprovalDenied { timestamp, data },
        "approval.expired" => ServerMessage::ApprovalExpired { timestamp, data },
        _ => return None,
    })
}

#[cfg(test)]
#[path = "broadcaster_tests.rs"]
mod tests;
