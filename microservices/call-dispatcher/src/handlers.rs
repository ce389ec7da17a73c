//! HTTP handlers for the Call Dispatcher API

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use brivas_dispatch_core::{
    DispatchError, DispatchMode, DispatchOptions, LeadRequest, Origin, ValidationError,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

use crate::error::{ApiError, Result};
use crate::{AppState, SERVICE_NAME};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub service: String,
}

/// Raw request body. Every field is optional so missing ones can be named.
#[derive(Debug, Default, Deserialize)]
pub struct DispatchCallRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DispatchCallResponse {
    pub success: bool,
    pub call_id: String,
    pub lead_id: String,
    pub phone_number: String,
    pub customer_name: String,
    pub address: String,
    pub message: String,
    pub timestamp: String,
    pub mode: DispatchMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub service: String,
    pub mode: DispatchMode,
    pub dispatches: DispatchCounts,
    pub latency_ms: LatencySummary,
}

#[derive(Serialize)]
pub struct DispatchCounts {
    pub accepted: u64,
    pub rejected: u64,
    pub failed: u64,
}

#[derive(Serialize)]
pub struct LatencySummary {
    pub count: usize,
    pub mean: f64,
    pub p50: f64,
    pub p99: f64,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        service: SERVICE_NAME.to_string(),
    })
}

pub async fn dispatch_call(
    State(state): State<AppState>,
    payload: std::result::Result<Json<DispatchCallRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DispatchCallResponse>)> {
    let Json(body) = payload.map_err(|e| {
        state.stats.rejected.inc();
        ApiError::from(ValidationError::MalformedBody(e.body_text()))
    })?;

    let lead = LeadRequest::new(
        body.first_name.as_deref(),
        body.last_name.as_deref(),
        body.phone_number.as_deref(),
        body.address.as_deref(),
    )
    .map_err(|e| {
        state.stats.rejected.inc();
        warn!(error = %e, "Rejected dispatch request");
        ApiError::from(e)
    })?;

    let cmd = state
        .dispatcher
        .prepare(&lead, &DispatchOptions::new(Origin::WebApi), Utc::now())
        .map_err(|e| {
            state.stats.rejected.inc();
            warn!(phone = %lead.phone_number, reason = %e.reason, "Invalid phone number");
            ApiError::from(DispatchError::from(e))
        })?;

    let started = Instant::now();
    let outcome = state.dispatcher.send(&cmd).await;
    state
        .stats
        .latency_ms
        .record(started.elapsed().as_secs_f64() * 1000.0);

    if !outcome.success {
        state.stats.failed.inc();
        return Err(ApiError::CallFailed {
            message: outcome.message,
            phone_number: outcome.phone_number,
        });
    }

    state.stats.accepted.inc();
    info!(call_id = %cmd.session.call_id, mode = %outcome.mode, "Dispatch request completed");

    Ok((
        StatusCode::OK,
        Json(DispatchCallResponse {
            success: true,
            call_id: cmd.session.call_id.clone(),
            lead_id: cmd.session.lead_id.clone(),
            phone_number: outcome.phone_number,
            customer_name: outcome.customer_name,
            address: outcome.address,
            message: outcome.message,
            timestamp: Utc::now().to_rfc3339(),
            mode: outcome.mode,
            command: outcome.command,
        }),
    ))
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = &state.stats;
    Json(StatsResponse {
        service: SERVICE_NAME.to_string(),
        mode: state.dispatcher.mode(),
        dispatches: DispatchCounts {
            accepted: stats.accepted.get(),
            rejected: stats.rejected.get(),
            failed: stats.failed.get(),
        },
        latency_ms: LatencySummary {
            count: stats.latency_ms.count(),
            mean: stats.latency_ms.mean(),
            p50: stats.latency_ms.percentile(50.0),
            p99: stats.latency_ms.percentile(99.0),
        },
    })
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
