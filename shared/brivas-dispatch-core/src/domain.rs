//! Domain types for outbound call dispatch

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::command::DispatchCommand;
use crate::error::{DispatchError, ErrorKind, ValidationError};

/// Longest accepted first or last name
pub const MAX_NAME_LEN: usize = 50;

/// Whether dispatches are only rendered or actually sent to the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    #[default]
    DryRun,
    Execute,
}

impl DispatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DryRun => "dry_run",
            Self::Execute => "execute",
        }
    }
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DispatchMode {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dry_run" | "dry-run" | "dryrun" => Ok(Self::DryRun),
            "execute" => Ok(Self::Execute),
            other => Err(DispatchError::Configuration(format!(
                "Invalid DISPATCH_MODE: {} (expected dry_run or execute)",
                other
            ))),
        }
    }
}

/// Where a dispatch originated, recorded in the call metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    WebApi,
    Cli,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebApi => "web_api",
            Self::Cli => "cli",
        }
    }
}

/// Lead contact details for one dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: String,
}

impl LeadRequest {
    /// Validate and trim raw fields. Fields are checked in declaration order and
    /// the first missing one is named in the error.
    pub fn new(
        first_name: Option<&str>,
        last_name: Option<&str>,
        phone_number: Option<&str>,
        address: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let first_name = required("first_name", first_name)?;
        let last_name = required("last_name", last_name)?;
        let phone_number = required("phone_number", phone_number)?;
        let address = required("address", address)?;

        Self::with_limits(first_name, last_name, phone_number, address)
    }

    /// Lead without a number yet. Batch and interactive dispatch fill one in per line.
    pub fn template(
        first_name: &str,
        last_name: &str,
        address: &str,
    ) -> Result<Self, ValidationError> {
        let first_name = required("first_name", Some(first_name))?;
        let last_name = required("last_name", Some(last_name))?;
        let address = required("address", Some(address))?;

        Self::with_limits(first_name, last_name, String::new(), address)
    }

    fn with_limits(
        first_name: String,
        last_name: String,
        phone_number: String,
        address: String,
    ) -> Result<Self, ValidationError> {
        for (field, value) in [("first_name", &first_name), ("last_name", &last_name)] {
            if value.chars().count() > MAX_NAME_LEN {
                return Err(ValidationError::FieldTooLong {
                    field,
                    max: MAX_NAME_LEN,
                });
            }
        }

        Ok(Self {
            first_name,
            last_name,
            phone_number,
            address,
        })
    }

    /// Same lead with a different raw phone number (batch lines reuse one template)
    pub fn with_phone(&self, phone_number: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            ..self.clone()
        }
    }

    pub fn customer_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn required(field: &'static str, value: Option<&str>) -> Result<String, ValidationError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ValidationError::MissingField(field))
}

/// One dispatch attempt. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallSession {
    pub call_id: String,
    pub lead_id: String,
    pub mode: DispatchMode,
    pub created_at: DateTime<Utc>,
}

/// Result of one dispatch attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub success: bool,
    pub mode: DispatchMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,
    pub phone_number: String,
    pub customer_name: String,
    pub address: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Rendered `lk` command, dry-run only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Dispatch id assigned by the platform, execute only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispatch_id: Option<String>,
}

impl DispatchOutcome {
    pub fn accepted(cmd: &DispatchCommand, message: impl Into<String>) -> Self {
        Self {
            success: true,
            mode: cmd.session.mode,
            call_id: Some(cmd.session.call_id.clone()),
            lead_id: Some(cmd.session.lead_id.clone()),
            phone_number: cmd.phone.e164(),
            customer_name: cmd.lead.customer_name(),
            address: cmd.lead.address.clone(),
            message: message.into(),
            error_kind: None,
            detail: None,
            command: None,
            dispatch_id: None,
        }
    }

    /// The platform rejected the dispatch or could not be reached. The
    /// platform's own error text is kept as the message.
    pub fn failed(cmd: &DispatchCommand, err: &DispatchError) -> Self {
        let phone = cmd.phone.e164();
        Self {
            success: false,
            mode: cmd.session.mode,
            call_id: Some(cmd.session.call_id.clone()),
            lead_id: Some(cmd.session.lead_id.clone()),
            message: err.to_string(),
            detail: Some(format!("Failed to dispatch call to {}", phone)),
            phone_number: phone,
            customer_name: cmd.lead.customer_name(),
            address: cmd.lead.address.clone(),
            error_kind: Some(err.kind()),
            command: None,
            dispatch_id: None,
        }
    }

    /// Input was rejected before any session was created
    pub fn rejected(lead: &LeadRequest, mode: DispatchMode, err: &ValidationError) -> Self {
        Self {
            success: false,
            mode,
            call_id: None,
            lead_id: None,
            phone_number: lead.phone_number.clone(),
            customer_name: lead.customer_name(),
            address: lead.address.clone(),
            message: err.to_string(),
            error_kind: Some(ErrorKind::ValidationError),
            detail: Some(match err {
                ValidationError::Phone(phone) => phone.reason.as_str().to_string(),
                other => other.to_string(),
            }),
            command: None,
            dispatch_id: None,
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_dispatch_id(mut self, dispatch_id: impl Into<String>) -> Self {
        self.dispatch_id = Some(dispatch_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_names_first_missing_field() {
        let err = LeadRequest::new(Some("John"), None, Some("2125551234"), None).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("last_name"));
        assert_eq!(err.to_string(), "Missing required field: last_name");
    }

    #[test]
    fn test_lead_blank_counts_as_missing() {
        let err =
            LeadRequest::new(Some("John"), Some("Smith"), Some("   "), Some("1 Main St")).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("phone_number"));
    }

    #[test]
    fn test_lead_trims_and_limits_names() {
        let lead = LeadRequest::new(
            Some("  John "),
            Some("Smith"),
            Some("(212) 555-1234"),
            Some(" 1 Main St "),
        )
        .unwrap();
        assert_eq!(lead.first_name, "John");
        assert_eq!(lead.address, "1 Main St");
        assert_eq!(lead.customer_name(), "John Smith");

        let long = "x".repeat(MAX_NAME_LEN + 1);
        let err = LeadRequest::new(Some(&long), Some("Smith"), Some("2125551234"), Some("a"))
            .unwrap_err();
        assert!(matches!(err, ValidationError::FieldTooLong { field: "first_name", .. }));
    }

    #[test]
    fn test_template_has_no_number() {
        let lead = LeadRequest::template("manual", "lead", "unknown").unwrap();
        assert!(lead.phone_number.is_empty());
        assert_eq!(lead.with_phone("2125551234").phone_number, "2125551234");
        assert_eq!(
            LeadRequest::template("", "lead", "unknown"),
            Err(ValidationError::MissingField("first_name"))
        );
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            LeadRequest::template("manual", &long, "unknown"),
            Err(ValidationError::FieldTooLong { field: "last_name", .. })
        ));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("execute".parse::<DispatchMode>().unwrap(), DispatchMode::Execute);
        assert_eq!("Dry-Run".parse::<DispatchMode>().unwrap(), DispatchMode::DryRun);
        assert!("live".parse::<DispatchMode>().is_err());
        assert_eq!(DispatchMode::default(), DispatchMode::DryRun);
    }
}
