//! Dispatch configuration, built once at process start

use std::fmt;
use std::time::Duration;

use crate::domain::DispatchMode;
use crate::error::{DispatchError, Result};

pub const DEFAULT_AGENT_NAME: &str = "outbound_call_agent";
pub const DEFAULT_AGENT_PERSONA: &str = "Jack";
pub const DEFAULT_DISPATCH_TIMEOUT_SECS: u64 = 30;

/// Endpoint and API credentials for the LiveKit deployment
#[derive(Clone)]
pub struct PlatformCredentials {
    pub url: String,
    pub api_key: String,
    pub api_secret: String,
}

impl fmt::Debug for PlatformCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformCredentials")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// SIP trunk the call agent bridges the customer through
    pub sip_trunk_id: String,
    /// Agent worker name registered with the platform
    pub agent_name: String,
    /// Persona announced to the customer, forwarded in metadata
    pub agent_persona: String,
    pub mode: DispatchMode,
    /// Absent when running dry-run without credentials
    pub platform: Option<PlatformCredentials>,
    pub dispatch_timeout: Duration,
    /// Address used for leads that arrive without one (CLI dispatch)
    pub default_address: String,
}

impl DispatchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let sip_trunk_id = get("SIP_OUTBOUND_TRUNK_ID").ok_or_else(|| {
            DispatchError::Configuration("SIP_OUTBOUND_TRUNK_ID not found in environment".into())
        })?;

        let mode = match get("DISPATCH_MODE") {
            Some(raw) => raw.parse()?,
            None => DispatchMode::default(),
        };

        let platform = match (
            get("LIVEKIT_URL"),
            get("LIVEKIT_API_KEY"),
            get("LIVEKIT_API_SECRET"),
        ) {
            (Some(url), Some(api_key), Some(api_secret)) => Some(PlatformCredentials {
                url,
                api_key,
                api_secret,
            }),
            _ => None,
        };

        let dispatch_timeout = match get("DISPATCH_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.parse().map_err(|e| {
                DispatchError::Configuration(format!("Invalid DISPATCH_TIMEOUT_SECS: {}", e))
            })?),
            None => Duration::from_secs(DEFAULT_DISPATCH_TIMEOUT_SECS),
        };

        let config = Self {
            sip_trunk_id,
            agent_name: get("AGENT_NAME").unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string()),
            agent_persona: get("AGENT_PERSONA")
                .unwrap_or_else(|| DEFAULT_AGENT_PERSONA.to_string()),
            mode,
            platform,
            dispatch_timeout,
            default_address: get("DEFAULT_ADDRESS").unwrap_or_else(|| "unknown".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Switch the operating mode, re-checking that execute mode has credentials
    pub fn with_mode(mut self, mode: DispatchMode) -> Result<Self> {
        self.mode = mode;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sip_trunk_id.is_empty() {
            return Err(DispatchError::Configuration(
                "SIP_OUTBOUND_TRUNK_ID not found in environment".into(),
            ));
        }
        if self.mode == DispatchMode::Execute && self.platform.is_none() {
            return Err(DispatchError::Configuration(
                "LiveKit credentials (LIVEKIT_URL, LIVEKIT_API_KEY, LIVEKIT_API_SECRET) not configured"
                    .into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_trunk_is_fatal() {
        let err = DispatchConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, DispatchError::Configuration(_)));
        assert!(err.to_string().contains("SIP_OUTBOUND_TRUNK_ID"));
    }

    #[test]
    fn test_defaults_to_dry_run() {
        let config =
            DispatchConfig::from_lookup(lookup(&[("SIP_OUTBOUND_TRUNK_ID", "ST_abc")])).unwrap();

        assert_eq!(config.mode, DispatchMode::DryRun);
        assert_eq!(config.agent_name, DEFAULT_AGENT_NAME);
        assert_eq!(config.agent_persona, "Jack");
        assert_eq!(config.dispatch_timeout, Duration::from_secs(30));
        assert!(config.platform.is_none());
    }

    #[test]
    fn test_execute_requires_credentials() {
        let err = DispatchConfig::from_lookup(lookup(&[
            ("SIP_OUTBOUND_TRUNK_ID", "ST_abc"),
            ("DISPATCH_MODE", "execute"),
            ("LIVEKIT_URL", "wss://example.livekit.cloud"),
        ]))
        .unwrap_err();
        assert!(matches!(err, DispatchError::Configuration(_)));

        let config = DispatchConfig::from_lookup(lookup(&[
            ("SIP_OUTBOUND_TRUNK_ID", "ST_abc"),
            ("DISPATCH_MODE", "execute"),
            ("LIVEKIT_URL", "wss://example.livekit.cloud"),
            ("LIVEKIT_API_KEY", "APIkey"),
            ("LIVEKIT_API_SECRET", "secret"),
        ]))
        .unwrap();
        assert_eq!(config.mode, DispatchMode::Execute);
    }

    #[test]
    fn test_with_mode_revalidates() {
        let config =
            DispatchConfig::from_lookup(lookup(&[("SIP_OUTBOUND_TRUNK_ID", "ST_abc")])).unwrap();
        assert!(config.with_mode(DispatchMode::Execute).is_err());
    }

    #[test]
    fn test_invalid_mode_and_timeout() {
        assert!(DispatchConfig::from_lookup(lookup(&[
            ("SIP_OUTBOUND_TRUNK_ID", "ST_abc"),
            ("DISPATCH_MODE", "sometimes"),
        ]))
        .is_err());
        assert!(DispatchConfig::from_lookup(lookup(&[
            ("SIP_OUTBOUND_TRUNK_ID", "ST_abc"),
            ("DISPATCH_TIMEOUT_SECS", "soon"),
        ]))
        .is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = PlatformCredentials {
            url: "https://lk".into(),
            api_key: "key".into(),
            api_secret: "hunter2".into(),
        };
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }
}
