//! Process-local dispatch metrics

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const DEFAULT_WINDOW: usize = 10_000;

/// Monotonic counter. Clones share the same value.
#[derive(Debug, Clone, Default)]
pub struct Counter {
    value: Arc<AtomicU64>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Sliding window of the most recent samples, for latency percentiles
#[derive(Debug, Clone)]
pub struct Histogram {
    window: usize,
    samples: Arc<Mutex<VecDeque<f64>>>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_WINDOW)
    }

    pub fn with_capacity(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            samples: Arc::new(Mutex::new(VecDeque::with_capacity(window.min(1024)))),
        }
    }

    pub fn record(&self, value: f64) {
        let mut samples = self.samples.lock();
        if samples.len() == self.window {
            samples.pop_front();
        }
        samples.push_back(value);
    }

    pub fn count(&self) -> usize {
        self.samples.lock().len()
    }

    /// Nearest-rank percentile over the window; 0.0 when nothing was recorded
    pub fn percentile(&self, p: f64) -> f64 {
        let mut sorted: Vec<f64> = self.samples.lock().iter().copied().collect();
        if sorted.is_empty() {
            return 0.0;
        }
        sorted.sort_by(f64::total_cmp);
        let rank = ((sorted.len() as f64) * p.clamp(0.0, 100.0) / 100.0) as usize;
        sorted[rank.min(sorted.len() - 1)]
    }

    pub fn mean(&self) -> f64 {
        let samples = self.samples.lock();
        match samples.len() {
            0 => 0.0,
            n => samples.iter().sum::<f64>() / n as f64,
        }
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}
