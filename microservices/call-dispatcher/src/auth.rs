//! API key middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::error::ApiError;
use crate::AppState;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Reject requests whose `X-API-Key` is absent or does not match the configured key
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorized = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|key| keys_match(key, &state.config.api_key));

    if !authorized {
        warn!(path = %request.uri().path(), "Rejected request with invalid or missing API key");
        return Err(ApiError::unauthorized());
    }

    Ok(next.run(request).await)
}

/// Compare without short-circuiting on the first differing byte
fn keys_match(provided: &str, expected: &str) -> bool {
    provided.len() == expected.len()
        && provided
            .bytes()
            .zip(expected.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_match() {
        assert!(keys_match("secret", "secret"));
        assert!(!keys_match("secreT", "secret"));
        assert!(!keys_match("secret1", "secret"));
        assert!(!keys_match("", "secret"));
    }
}
