//! Batch dispatch from a line source
//!
//! Each non-blank line is `phone` or `phone,lead_id`. Lines are dispatched in
//! input order and every line yields exactly one outcome; a failed line never
//! stops the lines after it.

use futures_util::future;
use futures_util::stream::{self, Stream, StreamExt};

use crate::dispatcher::{CallDispatcher, DispatchOptions};
use crate::domain::{DispatchOutcome, LeadRequest, Origin};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    /// 1-based line number in the source
    pub line: usize,
    pub phone: String,
    pub lead_id: Option<String>,
}

impl BatchEntry {
    /// `None` for blank lines
    pub fn parse(line: usize, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let (phone, lead_id) = match raw.split_once(',') {
            Some((phone, lead_id)) => (phone.trim(), Some(lead_id.trim().to_string())),
            None => (raw, None),
        };

        Some(Self {
            line,
            phone: phone.to_string(),
            lead_id: lead_id.filter(|id| !id.is_empty()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct BatchItem {
    pub line: usize,
    pub outcome: DispatchOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &DispatchOutcome) {
        self.processed += 1;
        if outcome.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

pub struct BatchRunner {
    dispatcher: CallDispatcher,
    base_lead: LeadRequest,
    origin: Origin,
    concurrency: usize,
}

impl BatchRunner {
    /// `base_lead` supplies name and address; each line supplies the number
    pub fn new(dispatcher: CallDispatcher, base_lead: LeadRequest) -> Self {
        Self {
            dispatcher,
            base_lead,
            origin: Origin::Cli,
            concurrency: 1,
        }
    }

    /// Allow up to `n` dispatches in flight. Output order still follows input order.
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Lazily dispatch each line. The stream borrows nothing from `self`, so a
    /// fresh stream can be started from the same source at any time.
    pub fn run<I>(&self, lines: I) -> impl Stream<Item = BatchItem>
    where
        I: IntoIterator<Item = String>,
    {
        self.run_stream(stream::iter(lines))
    }

    /// Same as [`run`](Self::run) for lines that arrive asynchronously, e.g. a
    /// file read one line at a time. Nothing is pulled ahead of the
    /// concurrency window.
    pub fn run_stream<S>(&self, lines: S) -> impl Stream<Item = BatchItem>
    where
        S: Stream<Item = String>,
    {
        let dispatcher = self.dispatcher.clone();
        let base_lead = self.base_lead.clone();
        let origin = self.origin;

        lines
            .enumerate()
            .filter_map(|(idx, raw)| future::ready(BatchEntry::parse(idx + 1, &raw)))
            .map(move |entry| {
                let dispatcher = dispatcher.clone();
                let line = entry.line;
                let lead = base_lead.with_phone(entry.phone);
                let options = DispatchOptions::new(origin).with_lead_id(entry.lead_id);
                async move {
                    let outcome = dispatcher.dispatch(&lead, &options).await;
                    BatchItem { line, outcome }
                }
            })
            .buffered(self.concurrency)
    }

    /// Run to completion, collecting every outcome
    pub async fn run_to_end<I>(&self, lines: I) -> (Vec<BatchItem>, BatchSummary)
    where
        I: IntoIterator<Item = String>,
    {
        let items: Vec<BatchItem> = self.run(lines).collect().await;
        let mut summary = BatchSummary::default();
        for item in &items {
            summary.record(&item.outcome);
        }
        (items, summary)
    }
}
