//! Dispatch clients
//!
//! Dry-run and execute are two implementations of [`DispatchClient`], picked
//! once from the configured mode. Callers never branch on the mode themselves.

mod dry_run;
mod livekit;
mod platform;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::command::DispatchCommand;
use crate::config::DispatchConfig;
use crate::domain::{DispatchMode, DispatchOutcome};
use crate::error::{DispatchError, Result};

pub use dry_run::DryRunClient;
pub use livekit::LiveKitApi;
pub use platform::PlatformClient;

#[async_trait]
pub trait DispatchClient: Send + Sync {
    fn mode(&self) -> DispatchMode;

    /// Send (or render) one command. Never retries.
    async fn dispatch(&self, cmd: &DispatchCommand) -> DispatchOutcome;
}

/// Create-dispatch request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentDispatchRequest {
    pub room: String,
    pub agent_name: String,
    pub metadata: String,
}

impl From<&DispatchCommand> for AgentDispatchRequest {
    fn from(cmd: &DispatchCommand) -> Self {
        Self {
            room: cmd.room_name.clone(),
            agent_name: cmd.agent_name.clone(),
            metadata: cmd.metadata_json(),
        }
    }
}

/// Dispatch accepted by the platform
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AgentDispatch {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "agentName")]
    pub agent_name: String,
    #[serde(default)]
    pub room: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Access token error: {0}")]
    Token(String),

    #[error("Platform rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Platform did not answer within {0:?}")]
    Timeout(Duration),
}

/// The media platform's room and agent-dispatch API
#[async_trait]
pub trait AgentDispatchApi: Send + Sync {
    async fn create_room(&self, room_name: &str) -> std::result::Result<(), PlatformError>;

    async fn create_dispatch(
        &self,
        request: &AgentDispatchRequest,
    ) -> std::result::Result<AgentDispatch, PlatformError>;
}

/// Build the client for the configured mode
pub fn client_for(config: &DispatchConfig) -> Result<Arc<dyn DispatchClient>> {
    match config.mode {
        DispatchMode::DryRun => Ok(Arc::new(DryRunClient::new())),
        DispatchMode::Execute => {
            let credentials = config.platform.as_ref().ok_or_else(|| {
                DispatchError::Configuration("LiveKit credentials not configured".into())
            })?;
            let api = LiveKitApi::new(credentials, config.dispatch_timeout)?;
            Ok(Arc::new(PlatformClient::new(
                Arc::new(api),
                config.dispatch_timeout,
            )))
        }
    }
}

/// Build a client around an explicit platform API
pub fn client_with_api(
    mode: DispatchMode,
    api: Arc<dyn AgentDispatchApi>,
    timeout: Duration,
) -> Arc<dyn DispatchClient> {
    match mode {
        DispatchMode::DryRun => Arc::new(DryRunClient::new()),
        DispatchMode::Execute => Arc::new(PlatformClient::new(api, timeout)),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::Origin;
    use crate::test_support::sample_command;

    /// Records every platform call; optionally fails or stalls
    #[derive(Default)]
    pub struct RecordingApi {
        pub calls: AtomicUsize,
        pub rooms: Mutex<Vec<String>>,
        pub dispatches: Mutex<Vec<AgentDispatchRequest>>,
        pub reject_with: Option<String>,
        pub stall: Option<Duration>,
    }

    impl RecordingApi {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AgentDispatchApi for RecordingApi {
        async fn create_room(&self, room_name: &str) -> std::result::Result<(), PlatformError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.stall {
                tokio::time::sleep(delay).await;
            }
            self.rooms.lock().push(room_name.to_string());
            Ok(())
        }

        async fn create_dispatch(
            &self,
            request: &AgentDispatchRequest,
        ) -> std::result::Result<AgentDispatch, PlatformError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(message) = &self.reject_with {
                return Err(PlatformError::Rejected {
                    status: 401,
                    message: message.clone(),
                });
            }
            self.dispatches.lock().push(request.clone());
            Ok(AgentDispatch {
                id: "AD_test".into(),
                agent_name: request.agent_name.clone(),
                room: request.room.clone(),
            })
        }
    }

    #[tokio::test]
    async fn test_dry_run_never_reaches_platform() {
        let api = Arc::new(RecordingApi::default());
        let client = client_with_api(DispatchMode::DryRun, api.clone(), Duration::from_secs(1));

        let outcome = client
            .dispatch(&sample_command(DispatchMode::DryRun, Origin::WebApi))
            .await;

        assert!(outcome.success);
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_execute_creates_room_then_dispatch() {
        let api = Arc::new(RecordingApi::default());
        let client = client_with_api(DispatchMode::Execute, api.clone(), Duration::from_secs(1));
        let cmd = sample_command(DispatchMode::Execute, Origin::WebApi);

        let outcome = client.dispatch(&cmd).await;

        assert!(outcome.success);
        assert_eq!(outcome.dispatch_id.as_deref(), Some("AD_test"));
        assert_eq!(api.calls(), 2);
        assert_eq!(*api.rooms.lock(), vec![cmd.room_name.clone()]);
        assert_eq!(api.dispatches.lock()[0], AgentDispatchRequest::from(&cmd));
    }

    #[test]
    fn test_client_for_dry_run_needs_no_credentials() {
        let config = DispatchConfig::from_lookup(|key| {
            (key == "SIP_OUTBOUND_TRUNK_ID").then(|| "ST_abc".to_string())
        })
        .unwrap();
        let client = client_for(&config).unwrap();
        assert_eq!(client.mode(), DispatchMode::DryRun);
    }
}
