// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wfe tail` — subscribe to a running `wfed` over its Unix socket and
//! print every matching event as it arrives.

use clap::Args;
use tokio::net::UnixStream;
use wfe_wire::{ClientMessage, ServerMessage, SubscriptionFilters};

use crate::exit_error::ExitError;
use crate::output::OutputFormat;
use crate::storage_handle;

#[derive(Args)]
pub struct TailArgs {
    /// Channel to subscribe to: "executions" or "approvals".
    #[arg(long, default_value = "executions")]
    channel: String,
    /// Only show events for this workflow id.
    #[arg(long)]
    workflow_id: Option<String>,
    /// Only show events for this execution id.
    #[arg(long)]
    execution_id: Option<String>,
}

pub async fn run(args: TailArgs, format: OutputFormat) -> anyhow::Result<()> {
    let socket_path = storage_handle::socket_path()?;
    let stream = UnixStream::connect(&socket_path)
        .await
        .map_err(|e| ExitError::new(1, format!("could not reach wfed at {}: {e}", socket_path.display())))?;
    let (mut reader, mut writer) = stream.into_split();

    let execution_ids = args
        .execution_id
        .map(|s| s.parse::<uuid::Uuid>().map(wfe_core::ExecutionId::from_uuid))
        .transpose()?
        .into_iter()
        .collect();
    let filters = SubscriptionFilters {
        workflow_ids: args.workflow_id.into_iter().map(wfe_core::WorkflowId::from_string).collect(),
        execution_ids,
        statuses: Vec::new(),
    };
    wfe_wire::write_message(&mut writer, &wfe_wire::encode(&ClientMessage::Subscribe { channel: args.channel, filters })?).await?;

    let ack: ServerMessage = wfe_wire::decode(&wfe_wire::read_message(&mut reader).await?)?;
    if !matches!(ack, ServerMessage::Subscribed { .. }) {
        anyhow::bail!("unexpected ack from wfed: {ack:?}");
    }

    loop {
        let frame = wfe_wire::read_message(&mut reader).await?;
        let message: ServerMessage = wfe_wire::decode(&frame)?;
        if matches!(message, ServerMessage::Pong) {
            continue;
        }
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string(&message)?),
            OutputFormat::Text => println!("{message:?}"),
        }
    }
}
