//! Brivas Telemetry
//!
//! Structured logging setup and the in-process counters the dispatcher reports.

mod config;
mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{Counter, Histogram};
pub use tracing_setup::init_tracing;

/// Initialize logging for a long-running service, honouring environment overrides
pub fn init(service_name: &str) -> Result<(), TelemetryError> {
    init_tracing(&TelemetryConfig::service(service_name).with_env())
}

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Tracing initialization failed: {0}")]
    TracingInit(String),

    #[error("Invalid log filter: {0}")]
    Filter(String),
}
