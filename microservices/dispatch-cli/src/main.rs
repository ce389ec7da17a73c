//! Dispatch CLI
//!
//! Operator tool for outbound sales calls: one number, a batch file, or an
//! interactive prompt. Shares validation and dispatch with the gateway.

mod args;
mod output;
mod runner;

use anyhow::Context;
use brivas_dispatch_core::{CallDispatcher, DispatchConfig, DispatchMode, LeadRequest};
use brivas_telemetry::{init_tracing, TelemetryConfig};
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use tokio::fs::File;
use tokio::io::BufReader;
use tracing::info;

use args::{CliArgs, RunMode};
use runner::Runner;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = CliArgs::parse();

    if let Err(e) = init_tracing(&TelemetryConfig::tool("dispatch-cli").with_env()) {
        eprintln!("Warning: {}", e);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match run(args, |key| std::env::var(key).ok(), &mut out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Everything after argument parsing. Any error here is a non-zero exit.
async fn run<F, W>(args: CliArgs, lookup: F, out: &mut W) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
    W: Write,
{
    let mut config = DispatchConfig::from_lookup(lookup)?;
    if args.execute {
        config = config.with_mode(DispatchMode::Execute)?;
    }

    let address = args
        .address
        .clone()
        .unwrap_or_else(|| config.default_address.clone());
    let base_lead = LeadRequest::template(&args.first_name, &args.last_name, &address)?;

    let dispatcher = CallDispatcher::from_config(&config)?;
    info!(mode = %dispatcher.mode(), "Dispatcher ready");

    let mode = dispatcher.mode();
    let runner = Runner::new(dispatcher, base_lead).with_concurrency(usize::from(args.concurrency));

    match args.run_mode() {
        RunMode::Batch(path) => {
            let file = File::open(&path)
                .await
                .with_context(|| format!("File {} could not be read", path.display()))?;
            output::write_banner(out, mode)?;
            runner
                .batch(BufReader::new(file), out)
                .await
                .with_context(|| format!("Reading {} failed", path.display()))?;
        }
        RunMode::Single(phone) => {
            output::write_banner(out, mode)?;
            runner.single(&phone, args.lead_id, out).await?;
        }
        RunMode::Interactive => {
            output::write_banner(out, mode)?;
            let stdin = BufReader::new(tokio::io::stdin());
            runner.interactive(stdin, out).await?;
        }
    }

    out.flush()?;
    Ok(())
}
