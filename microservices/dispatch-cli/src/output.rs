//! Human-readable rendering of dispatch outcomes

use brivas_dispatch_core::{BatchSummary, DispatchMode, DispatchOutcome, ErrorKind};
use std::io::{self, Write};

pub const BANNER: &str = "Outbound Call Dispatcher";

pub fn write_banner<W: Write>(out: &mut W, mode: DispatchMode) -> io::Result<()> {
    writeln!(out, "{} ({})", BANNER, mode)?;
    writeln!(out, "{}", "=".repeat(60))
}

pub fn write_outcome<W: Write>(out: &mut W, outcome: &DispatchOutcome) -> io::Result<()> {
    match outcome.error_kind {
        None => {
            writeln!(out, "Preparing call to: {}", outcome.phone_number)?;
            if let Some(call_id) = &outcome.call_id {
                writeln!(out, "Call id: {}", call_id)?;
            }
            match (&outcome.command, outcome.mode) {
                (Some(command), DispatchMode::DryRun) => {
                    writeln!(out, "Command to execute: {}", command)?;
                    writeln!(out, "Add --execute to actually make the call")
                }
                _ => writeln!(out, "{}", outcome.message),
            }
        }
        Some(ErrorKind::ValidationError) => writeln!(
            out,
            "Invalid phone number: {} ({})",
            outcome.phone_number,
            outcome.detail.as_deref().unwrap_or("invalid_format")
        ),
        Some(_) => writeln!(
            out,
            "Failed to dispatch call to {}: {}",
            outcome.phone_number, outcome.message
        ),
    }
}

pub fn write_summary<W: Write>(out: &mut W, summary: &BatchSummary) -> io::Result<()> {
    writeln!(
        out,
        "\nResults: {}/{} calls processed successfully ({} failed)",
        summary.succeeded, summary.processed, summary.failed
    )
}
