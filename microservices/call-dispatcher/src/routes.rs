//! Router configuration for the Call Dispatcher API

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::require_api_key;
use crate::handlers;
use crate::AppState;

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/v1/dispatch-call", post(handlers::dispatch_call))
        .route("/stats", get(handlers::stats))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(protected)
        .fallback(handlers::not_found)
        .with_state(state)
}
