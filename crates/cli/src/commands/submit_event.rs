// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wfe submit-event` — ingest a trigger event against the on-disk store,
//! starting one execution per enabled workflow bound to its event type.

use std::sync::Arc;

use clap::Args;
use serde_json::Value;
use uuid::Uuid;
use wfe_adapters::{LocalMessageBus, LoggingNotificationSink, LoggingRecordSink, ReqwestHttpSink};
use wfe_core::{Event, OrganizationId, SystemClock};
use wfe_engine::{ActionExecutor, ApprovalCoordinator, ContextBuilder, EventRouter, Interpreter};

use crate::output::OutputFormat;
use crate::storage_handle;

#[derive(Args)]
pub struct SubmitEventArgs {
    /// Organization the event belongs to.
    #[arg(long)]
    organization_id: Uuid,
    /// Event type, matched against each workflow's trigger.
    #[arg(long)]
    event_type: String,
    /// Free-form source label (e.g. "checkout-service").
    #[arg(long)]
    source: String,
    /// JSON payload. Defaults to an empty object.
    #[arg(long, default_value = "{}")]
    payload: String,
}

pub async fn run(args: SubmitEventArgs, format: OutputFormat) -> anyhow::Result<()> {
    let payload: Value = serde_json::from_str(&args.payload)?;
    let storage = storage_handle::open()?;
    let clock = SystemClock;
    let bus: Arc<dyn wfe_adapters::MessageBus> = Arc::new(LocalMessageBus::default());

    let context = ContextBuilder::new(vec![], storage.clone(), clock.clone(), 60_000);
    let actions = ActionExecutor::new(LoggingNotificationSink, LoggingRecordSink, ReqwestHttpSink::default());
    let approvals = ApprovalCoordinator::new(storage.clone(), storage.clone(), bus.clone(), clock.clone());
    let interpreter = Arc::new(Interpreter::new(actions, approvals, storage.clone(), bus.clone(), clock.clone()));
    let router = EventRouter::new(storage.clone(), storage.clone(), storage.clone(), context, interpreter, bus, clock);

    let now_ms = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH)?.as_millis() as u64;
    let event = Event::new(OrganizationId(args.organization_id), args.event_type, args.source, payload, now_ms);
    let event_id = event.id;
    let triggered = router.ingest(event).await?;

    crate::output::format_or_json(
        format,
        &serde_json::json!({ "event_id": event_id, "triggered_executions": triggered }),
        || {
            println!("event {event_id} submitted, {} execution(s) triggered", triggered.len());
            for id in &triggered {
                println!("  {id}");
            }
        },
    )
}
