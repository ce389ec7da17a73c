//! Single, batch and interactive dispatch loops

use brivas_dispatch_core::{
    BatchRunner, BatchSummary, CallDispatcher, DispatchOptions, DispatchOutcome, LeadRequest,
    Origin,
};
use futures_util::{pin_mut, stream, StreamExt};
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::output::{write_outcome, write_summary};

const QUIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

pub struct Runner {
    dispatcher: CallDispatcher,
    base_lead: LeadRequest,
    concurrency: usize,
}

impl Runner {
    pub fn new(dispatcher: CallDispatcher, base_lead: LeadRequest) -> Self {
        Self {
            dispatcher,
            base_lead,
            concurrency: 1,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub async fn single<W: Write>(
        &self,
        phone: &str,
        lead_id: Option<String>,
        out: &mut W,
    ) -> io::Result<DispatchOutcome> {
        let lead = self.base_lead.with_phone(phone.trim());
        let options = DispatchOptions::new(Origin::Cli).with_lead_id(lead_id);
        let outcome = self.dispatcher.dispatch(&lead, &options).await;
        write_outcome(out, &outcome)?;
        Ok(outcome)
    }

    /// Dispatch every line read from `reader`, printing outcomes as they complete.
    /// Lines are pulled one at a time; a read error stops the batch.
    pub async fn batch<R, W>(&self, reader: R, out: &mut W) -> io::Result<BatchSummary>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "Processing outbound calls...")?;

        let runner = BatchRunner::new(self.dispatcher.clone(), self.base_lead.clone())
            .with_origin(Origin::Cli)
            .with_concurrency(self.concurrency);

        let mut read_error = None;
        let mut summary = BatchSummary::default();
        {
            let lines = stream::unfold(
                (reader.lines(), &mut read_error),
                |(mut lines, slot)| async move {
                    match lines.next_line().await {
                        Ok(Some(line)) => Some((line, (lines, slot))),
                        Ok(None) => None,
                        Err(e) => {
                            *slot = Some(e);
                            None
                        }
                    }
                },
            );
            let items = runner.run_stream(lines);
            pin_mut!(items);

            while let Some(item) = items.next().await {
                debug!(line = item.line, success = item.outcome.success, "Batch line done");
                writeln!(
                    out,
                    "\n--- Call {} (line {}) ---",
                    summary.processed + 1,
                    item.line
                )?;
                write_outcome(out, &item.outcome)?;
                summary.record(&item.outcome);
            }
        }

        if let Some(e) = read_error {
            return Err(e);
        }

        write_summary(out, &summary)?;
        Ok(summary)
    }

    /// Prompt for numbers until a quit word or end of input
    pub async fn interactive<R, W>(&self, input: R, out: &mut W) -> io::Result<BatchSummary>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "Interactive mode - enter phone numbers to call")?;
        writeln!(out, "Type 'quit' to exit")?;

        let mut lines = input.lines();
        let mut summary = BatchSummary::default();

        loop {
            write!(out, "\nPhone number: ")?;
            out.flush()?;
            let Some(phone) = lines.next_line().await? else {
                break;
            };
            let phone = phone.trim().to_string();
            if QUIT_WORDS.contains(&phone.to_lowercase().as_str()) {
                break;
            }
            if phone.is_empty() {
                continue;
            }

            write!(out, "Lead ID (optional): ")?;
            out.flush()?;
            let lead_id = lines.next_line().await?;

            let outcome = self.single(&phone, lead_id, out).await?;
            summary.record(&outcome);
        }

        writeln!(out, "\nGoodbye!")?;
        Ok(summary)
    }
}
