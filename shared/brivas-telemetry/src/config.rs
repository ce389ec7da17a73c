//! Telemetry Configuration

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub log_level: String,
    pub json_logs: bool,
}

impl TelemetryConfig {
    /// Defaults suited to a long-running service: JSON lines at `info`
    pub fn service(service_name: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
            log_level: "info".to_string(),
            json_logs: true,
        }
    }

    /// Defaults suited to an interactive tool: plain text, warnings only
    pub fn tool(service_name: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
            log_level: "warn".to_string(),
            json_logs: false,
        }
    }

    /// Apply `SERVICE_NAME`, `RUST_LOG` and `JSON_LOGS` overrides
    pub fn with_env(self) -> Self {
        Self::with_lookup(self, |key| std::env::var(key).ok())
    }

    pub fn with_lookup<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            service_name: lookup("SERVICE_NAME").unwrap_or(self.service_name),
            log_level: lookup("RUST_LOG").unwrap_or(self.log_level),
            json_logs: lookup("JSON_LOGS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(self.json_logs),
        }
    }
}
