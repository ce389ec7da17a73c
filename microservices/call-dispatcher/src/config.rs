//! Gateway configuration

use brivas_dispatch_core::{DispatchConfig, DispatchError};
use std::net::SocketAddr;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Shared secret expected in `X-API-Key`
    pub api_key: String,
    pub dispatch: DispatchConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, DispatchError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, DispatchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("API_KEY").ok_or_else(|| {
            DispatchError::Configuration("API_KEY not found in environment".into())
        })?;

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| DispatchError::Configuration(format!("Invalid PORT: {}", e)))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            api_key,
            dispatch: DispatchConfig::from_lookup(&lookup)?,
        })
    }

    pub fn bind_address(&self) -> Result<SocketAddr, DispatchError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| DispatchError::Configuration(format!("Invalid bind address: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brivas_dispatch_core::DispatchMode;

    #[test]
    fn test_api_key_required() {
        let err = Config::from_lookup(|key| match key {
            "SIP_OUTBOUND_TRUNK_ID" => Some("ST_abc".into()),
            _ => None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("API_KEY"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|key| match key {
            "API_KEY" => Some("k".into()),
            "SIP_OUTBOUND_TRUNK_ID" => Some("ST_abc".into()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.dispatch.mode, DispatchMode::DryRun);
        assert_eq!(config.bind_address().unwrap().to_string(), "0.0.0.0:5000");
    }

    #[test]
    fn test_invalid_port() {
        assert!(Config::from_lookup(|key| match key {
            "API_KEY" => Some("k".into()),
            "SIP_OUTBOUND_TRUNK_ID" => Some("ST_abc".into()),
            "PORT" => Some("fifty".into()),
            _ => None,
        })
        .is_err());
    }
}
