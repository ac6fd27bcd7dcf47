// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wfe` — a thin client for local development against a running `wfed`.
//! Argument parsing and display only; no business logic lives here.

mod color;
mod commands;
mod exit_error;
mod output;
mod storage_handle;

use clap::Parser;

use commands::{submit_event, tail, trace};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "wfe", version, about = "Workflow engine CLI", styles = color::styles())]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Submit a trigger event directly against the on-disk store.
    SubmitEvent(submit_event::SubmitEventArgs),
    /// Subscribe to the running daemon and print events as they arrive.
    Tail(tail::TailArgs),
    /// Print the step-by-step trace for one execution.
    Trace(trace::TraceArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::SubmitEvent(args) => submit_event::run(args, cli.output).await,
        Command::Tail(args) => tail::run(args, cli.output).await,
        Command::Trace(args) => trace::run(args, cli.output).await,
    };

    if let Err(e) = result {
        if let Some(exit) = e.downcast_ref::<exit_error::ExitError>() {
            eprintln!("{exit}");
            std::process::exit(exit.code);
        }
        eprintln!("error: {e}");
        std::process::exit(1);
    }
    Ok(())
}
