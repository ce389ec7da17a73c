use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_FIRST_NAME: &str = "manual";
pub const DEFAULT_LAST_NAME: &str = "lead";

/// Command line for `dispatch-cli`.
///
/// Without a phone number or `--batch` the tool prompts for numbers
/// interactively. Dispatches are dry runs unless `--execute` is given.
#[derive(Parser, Debug, Clone)]
#[command(name = "dispatch-cli", version, about = "Dispatch outbound sales calls")]
pub struct CliArgs {
    /// Phone number to call
    pub phone: Option<String>,

    /// Lead id for tracking, replacing the generated one
    #[arg(long)]
    pub lead_id: Option<String>,

    /// File with one `phone[,lead_id]` per line
    #[arg(long, value_name = "FILE")]
    pub batch: Option<PathBuf>,

    /// Actually place the calls (default: dry run)
    #[arg(long)]
    pub execute: bool,

    #[arg(long, default_value = DEFAULT_FIRST_NAME)]
    pub first_name: String,

    #[arg(long, default_value = DEFAULT_LAST_NAME)]
    pub last_name: String,

    /// Customer address; falls back to `DEFAULT_ADDRESS`
    #[arg(long)]
    pub address: Option<String>,

    /// Batch dispatches allowed in flight at once
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    Batch(PathBuf),
    Single(String),
    Interactive,
}

impl CliArgs {
    /// `--batch` wins over a positional number
    pub fn run_mode(&self) -> RunMode {
        match (&self.batch, &self.phone) {
            (Some(path), _) => RunMode::Batch(path.clone()),
            (None, Some(phone)) => RunMode::Single(phone.clone()),
            (None, None) => RunMode::Interactive,
        }
    }
}
