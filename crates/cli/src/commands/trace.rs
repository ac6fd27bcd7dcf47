// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wfe trace` — print the step-by-step trace for one execution, read
//! directly from the on-disk store.

use clap::Args;
use uuid::Uuid;
use wfe_core::{ExecutionId, OrganizationId};
use wfe_storage::ExecutionStore;

use crate::output::{format_time_ago, format_or_json, OutputFormat};
use crate::storage_handle;

#[derive(Args)]
pub struct TraceArgs {
    /// Organization the execution belongs to.
    #[arg(long)]
    organization_id: Uuid,
    /// Execution id to trace.
    #[arg(long)]
    execution_id: Uuid,
}

pub async fn run(args: TraceArgs, format: OutputFormat) -> anyhow::Result<()> {
    let storage = storage_handle::open()?;
    let org = OrganizationId(args.organization_id);
    let execution_id = ExecutionId(args.execution_id);

    let execution = storage.get_by_id(org, execution_id)?;
    let steps = storage.trace(org, execution_id)?;

    format_or_json(format, &serde_json::json!({ "execution": execution, "steps": steps }), || {
        println!("execution {} [{:?}] started {}", execution.id, execution.status, format_time_ago(execution.started_at_ms));
        if let Some(err) = &execution.error_message {
            println!("  error: {err}");
        }
        for step in &steps {
            let duration = step.duration_ms.map(|ms| format!("{ms}ms")).unwrap_or_else(|| "-".to_string());
            println!("  {} [{:?}] {} ({duration})", step.step_id, step.status, step.step_type);
            if let Some(err) = &step.error_message {
                println!("    error: {err}");
            }
        }
    })
}
