use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use super::{AgentDispatch, AgentDispatchApi, AgentDispatchRequest, DispatchClient, PlatformError};
use crate::command::DispatchCommand;
use crate::domain::{DispatchMode, DispatchOutcome};
use crate::error::DispatchError;

/// Sends dispatches to the media platform, bounded by a timeout
pub struct PlatformClient {
    api: Arc<dyn AgentDispatchApi>,
    timeout: Duration,
}

impl PlatformClient {
    pub fn new(api: Arc<dyn AgentDispatchApi>, timeout: Duration) -> Self {
        Self { api, timeout }
    }

    async fn send(&self, cmd: &DispatchCommand) -> Result<AgentDispatch, PlatformError> {
        let request = AgentDispatchRequest::from(cmd);

        let attempt = async {
            self.api.create_room(&cmd.room_name).await?;
            info!(room = %cmd.room_name, "Created room");
            self.api.create_dispatch(&request).await
        };

        tokio::time::timeout(self.timeout, attempt)
            .await
            .map_err(|_| PlatformError::Timeout(self.timeout))?
    }
}

#[async_trait]
impl DispatchClient for PlatformClient {
    fn mode(&self) -> DispatchMode {
        DispatchMode::Execute
    }

    async fn dispatch(&self, cmd: &DispatchCommand) -> DispatchOutcome {
        info!(
            call_id = %cmd.session.call_id,
            phone = %cmd.phone,
            customer = %cmd.lead.customer_name(),
            "Dispatching call"
        );

        match self.send(cmd).await {
            Ok(dispatch) => {
                info!(call_id = %cmd.session.call_id, dispatch_id = %dispatch.id, "Dispatch successful");
                DispatchOutcome::accepted(
                    cmd,
                    format!("Call dispatched successfully to {}", cmd.lead.customer_name()),
                )
                .with_dispatch_id(dispatch.id)
            }
            Err(e) => {
                error!(call_id = %cmd.session.call_id, error = %e, "Dispatch failed");
                DispatchOutcome::failed(cmd, &DispatchError::DispatchFailed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::RecordingApi;
    use crate::domain::Origin;
    use crate::error::ErrorKind;
    use crate::test_support::sample_command;

    #[tokio::test]
    async fn test_rejection_is_dispatch_failed_with_message() {
        let api = Arc::new(RecordingApi {
            reject_with: Some("invalid API key".into()),
            ..Default::default()
        });
        let client = PlatformClient::new(api.clone(), Duration::from_secs(1));
        let cmd = sample_command(DispatchMode::Execute, Origin::WebApi);

        let outcome = client.dispatch(&cmd).await;

        assert!(!outcome.success);
        assert_eq!(outcome.error_kind, Some(ErrorKind::DispatchFailed));
        assert!(outcome.message.contains("invalid API key"));
        assert_eq!(
            outcome.detail.as_deref(),
            Some("Failed to dispatch call to +12125551234")
        );
        // one room, one dispatch, no retry
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn test_hanging_platform_times_out() {
        let api = Arc::new(RecordingApi {
            stall: Some(Duration::from_secs(5)),
            ..Default::default()
        });
        let client = PlatformClient::new(api, Duration::from_millis(20));
        let cmd = sample_command(DispatchMode::Execute, Origin::Cli);

        let outcome = client.dispatch(&cmd).await;

        assert!(!outcome.success);
        assert_eq!(outcome.error_kind, Some(ErrorKind::DispatchFailed));
        assert!(outcome.message.contains("did not answer"));
    }
}
