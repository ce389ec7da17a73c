//! Single-lead dispatch: normalize, identify, build, send

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;

use crate::client::{client_for, DispatchClient};
use crate::command::{CommandBuilder, DispatchCommand};
use crate::config::DispatchConfig;
use crate::domain::{DispatchMode, DispatchOutcome, LeadRequest, Origin};
use crate::error::{PhoneError, Result, ValidationError};
use crate::identifiers::make_identifiers;
use crate::phone::normalize;

#[derive(Debug, Clone)]
pub struct DispatchOptions {
    pub origin: Origin,
    /// Operator-supplied lead id replacing the generated one
    pub lead_id: Option<String>,
}

impl DispatchOptions {
    pub fn new(origin: Origin) -> Self {
        Self {
            origin,
            lead_id: None,
        }
    }

    pub fn with_lead_id(mut self, lead_id: Option<String>) -> Self {
        self.lead_id = lead_id.filter(|id| !id.trim().is_empty());
        self
    }
}

/// Shared by all requests; holds only read-only state
#[derive(Clone)]
pub struct CallDispatcher {
    builder: CommandBuilder,
    client: Arc<dyn DispatchClient>,
}

impl CallDispatcher {
    pub fn new(config: &DispatchConfig, client: Arc<dyn DispatchClient>) -> Self {
        Self {
            builder: CommandBuilder::from_config(config),
            client,
        }
    }

    pub fn from_config(config: &DispatchConfig) -> Result<Self> {
        Ok(Self::new(config, client_for(config)?))
    }

    pub fn mode(&self) -> DispatchMode {
        self.client.mode()
    }

    /// Validate the number and assemble the command without sending it
    pub fn prepare(
        &self,
        lead: &LeadRequest,
        options: &DispatchOptions,
        now: DateTime<Utc>,
    ) -> std::result::Result<DispatchCommand, PhoneError> {
        let phone = normalize(&lead.phone_number)?;

        let mut ids = make_identifiers(&phone, &lead.first_name, &lead.last_name, now);
        if let Some(lead_id) = &options.lead_id {
            ids = ids.with_lead_id(lead_id.trim());
        }
        let session = ids.into_session(self.mode(), now);

        Ok(self.builder.build(session, lead, phone, options.origin))
    }

    /// Hand a prepared command to the configured client
    pub async fn send(&self, cmd: &DispatchCommand) -> DispatchOutcome {
        self.client.dispatch(cmd).await
    }

    /// One lead, one outcome. Validation failures never reach the client.
    pub async fn dispatch(&self, lead: &LeadRequest, options: &DispatchOptions) -> DispatchOutcome {
        match self.prepare(lead, options, Utc::now()) {
            Ok(cmd) => self.send(&cmd).await,
            Err(e) => {
                warn!(phone = %lead.phone_number, reason = %e.reason, "Invalid phone number");
                DispatchOutcome::rejected(lead, self.mode(), &ValidationError::Phone(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::client_with_api;
    use crate::client::tests::RecordingApi;
    use crate::error::ErrorKind;
    use crate::test_support::sample_lead;
    use std::time::Duration;

    fn config() -> DispatchConfig {
        DispatchConfig::from_lookup(|key| match key {
            "SIP_OUTBOUND_TRUNK_ID" => Some("ST_abc".into()),
            _ => None,
        })
        .unwrap()
    }

    fn dispatcher(mode: DispatchMode, api: Arc<RecordingApi>) -> CallDispatcher {
        CallDispatcher::new(&config(), client_with_api(mode, api, Duration::from_secs(1)))
    }

    #[tokio::test]
    async fn test_invalid_phone_is_validation_failure() {
        let api = Arc::new(RecordingApi::default());
        let outcome = dispatcher(DispatchMode::Execute, api.clone())
            .dispatch(&sample_lead("+15551234567"), &DispatchOptions::new(Origin::WebApi))
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.error_kind, Some(ErrorKind::ValidationError));
        assert!(outcome.message.contains("invalid_exchange_code"));
        assert_eq!(outcome.detail.as_deref(), Some("invalid_exchange_code"));
        assert!(outcome.call_id.is_none());
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_execute_dispatch_success() {
        let api = Arc::new(RecordingApi::default());
        let outcome = dispatcher(DispatchMode::Execute, api.clone())
            .dispatch(&sample_lead("212-555-1234"), &DispatchOptions::new(Origin::WebApi))
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.mode, DispatchMode::Execute);
        assert!(outcome.call_id.unwrap().starts_with("outbound_call_12125551234_john_o'brien_"));
        assert_eq!(api.dispatches.lock()[0].agent_name, "outbound_call_agent");
    }

    #[test]
    fn test_prepare_applies_lead_override() {
        let d = dispatcher(DispatchMode::DryRun, Arc::new(RecordingApi::default()));
        let options = DispatchOptions::new(Origin::Cli).with_lead_id(Some(" CRM-7 ".into()));

        let cmd = d.prepare(&sample_lead("2125551234"), &options, Utc::now()).unwrap();

        assert_eq!(cmd.session.lead_id, "CRM-7");
        assert_eq!(cmd.metadata["lead_id"], "CRM-7");
        assert!(cmd.session.call_id.contains("12125551234"));
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let options = DispatchOptions::new(Origin::Cli).with_lead_id(Some("  ".into()));
        assert!(options.lead_id.is_none());
    }
}
