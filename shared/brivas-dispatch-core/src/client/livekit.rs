//! LiveKit Twirp API client (RoomService / AgentDispatchService)

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use super::{AgentDispatch, AgentDispatchApi, AgentDispatchRequest, PlatformError};
use crate::config::PlatformCredentials;
use crate::error::{DispatchError, Result};

const ROOM_SERVICE: &str = "livekit.RoomService";
const AGENT_DISPATCH_SERVICE: &str = "livekit.AgentDispatchService";
const TOKEN_TTL_SECS: i64 = 600;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoGrant {
    room_create: bool,
    room_admin: bool,
    room: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct AccessClaims {
    iss: String,
    nbf: i64,
    exp: i64,
    video: VideoGrant,
}

/// Twirp error body
#[derive(Debug, Deserialize)]
struct TwirpError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    msg: String,
}

pub struct LiveKitApi {
    base_url: String,
    api_key: String,
    encoding_key: EncodingKey,
    http_client: reqwest::Client,
}

impl LiveKitApi {
    pub fn new(credentials: &PlatformCredentials, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            base_url: http_base_url(&credentials.url),
            api_key: credentials.api_key.clone(),
            encoding_key: EncodingKey::from_secret(credentials.api_secret.as_bytes()),
            http_client,
        })
    }

    /// Short-lived admin token scoped to one room
    fn access_token(&self, room: &str) -> std::result::Result<String, PlatformError> {
        let now = Utc::now();
        let claims = AccessClaims {
            iss: self.api_key.clone(),
            nbf: now.timestamp(),
            exp: (now + ChronoDuration::seconds(TOKEN_TTL_SECS)).timestamp(),
            video: VideoGrant {
                room_create: true,
                room_admin: true,
                room: room.to_string(),
            },
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| PlatformError::Token(e.to_string()))
    }

    async fn call(
        &self,
        service: &str,
        method: &str,
        room: &str,
        body: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, PlatformError> {
        let token = self.access_token(room)?;

        let response = self
            .http_client
            .post(format!("{}/twirp/{}/{}", self.base_url, service, method))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| PlatformError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<TwirpError>(&text) {
                Ok(err) if !err.msg.is_empty() => format!("{}: {}", err.code, err.msg),
                _ => text,
            };
            return Err(PlatformError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| PlatformError::Network(e.to_string()))
    }
}

#[async_trait]
impl AgentDispatchApi for LiveKitApi {
    async fn create_room(&self, room_name: &str) -> std::result::Result<(), PlatformError> {
        self.call(ROOM_SERVICE, "CreateRoom", room_name, json!({ "name": room_name }))
            .await
            .map(|_| ())
    }

    async fn create_dispatch(
        &self,
        request: &AgentDispatchRequest,
    ) -> std::result::Result<AgentDispatch, PlatformError> {
        let body = serde_json::to_value(request)
            .map_err(|e| PlatformError::Network(e.to_string()))?;
        let value = self
            .call(AGENT_DISPATCH_SERVICE, "CreateDispatch", &request.room, body)
            .await?;

        serde_json::from_value(value).map_err(|e| PlatformError::Network(e.to_string()))
    }
}

/// Twirp is served over HTTP on the same host as the signalling websocket
fn http_base_url(url: &str) -> String {
    let url = url.trim_end_matches('/');
    if let Some(rest) = url.strip_prefix("wss://") {
        format!("https://{}", rest)
    } else if let Some(rest) = url.strip_prefix("ws://") {
        format!("http://{}", rest)
    } else {
        url.to_string()
    }
}
