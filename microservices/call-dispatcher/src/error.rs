//! Error types for the Call Dispatcher API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use brivas_dispatch_core::{DispatchError, ValidationError};
use serde_json::json;

/// Result type alias
pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The platform refused or never answered; its message is passed through
    #[error("{message}")]
    CallFailed {
        message: String,
        phone_number: String,
    },

    #[error("The requested endpoint does not exist")]
    NotFound,
}

impl ApiError {
    pub fn unauthorized() -> Self {
        Self::Dispatch(DispatchError::Authentication(
            "Please provide a valid X-API-Key header".into(),
        ))
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Dispatch(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Dispatch(err) => {
                let status = StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let message = match err {
                    DispatchError::Authentication(msg) => msg.clone(),
                    DispatchError::Configuration(_) => {
                        tracing::error!("Internal error: {:?}", err);
                        "Internal server error".to_string()
                    }
                    other => other.to_string(),
                };
                (
                    status,
                    json!({
                        "success": false,
                        "error": err.category(),
                        "message": message,
                    }),
                )
            }
            ApiError::CallFailed {
                message,
                phone_number,
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "success": false,
                    "error": "Dispatch failed",
                    "message": message,
                    "phone_number": phone_number,
                }),
            ),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({
                    "success": false,
                    "error": "Not found",
                    "message": self.to_string(),
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
