//! Call Dispatcher Microservice
//!
//! REST gateway for outbound sales calls:
//! - Validates lead details and US phone numbers
//! - Dispatches the outbound call agent through LiveKit (or renders the
//!   dispatch in dry-run mode)
//! - API key authentication and per-process dispatch statistics

mod auth;
mod config;
mod error;
mod handlers;
mod routes;


use brivas_dispatch_core::CallDispatcher;
use brivas_telemetry::{Counter, Histogram};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

pub use config::Config;

pub const SERVICE_NAME: &str = "outbound-call-dispatcher";

/// Dispatch counters reported on `/stats`
#[derive(Clone)]
pub struct DispatchStats {
    pub accepted: Counter,
    pub rejected: Counter,
    pub failed: Counter,
    pub latency_ms: Histogram,
}

impl DispatchStats {
    pub fn new() -> Self {
        Self {
            accepted: Counter::new(),
            rejected: Counter::new(),
            failed: Counter::new(),
            latency_ms: Histogram::new(),
        }
    }
}

impl Default for DispatchStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatcher: CallDispatcher,
    pub stats: DispatchStats,
}

impl AppState {
    pub fn new(config: Config, dispatcher: CallDispatcher) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher,
            stats: DispatchStats::new(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    brivas_telemetry::init(SERVICE_NAME)?;

    info!("Starting Call Dispatcher microservice");

    let config = Config::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;
    let bind_addr = config.bind_address()?;

    let dispatcher = CallDispatcher::from_config(&config.dispatch)?;
    info!(
        mode = %dispatcher.mode(),
        agent = %config.dispatch.agent_name,
        "Dispatcher ready"
    );

    let state = AppState::new(config, dispatcher);
    let app = routes::create_router(state);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Call Dispatcher listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;

    info!("Call Dispatcher stopped");
    Ok(())
}

async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining in-flight requests");
}
