//! Error taxonomy for outbound call dispatch

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DispatchError>;

/// Why a raw phone string was rejected by the normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneRejection {
    InvalidFormat,
    InvalidAreaCode,
    InvalidExchangeCode,
}

impl PhoneRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "invalid_format",
            Self::InvalidAreaCode => "invalid_area_code",
            Self::InvalidExchangeCode => "invalid_exchange_code",
        }
    }
}

impl fmt::Display for PhoneRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Phone number {input} is not a valid US phone number ({reason})")]
pub struct PhoneError {
    pub input: String,
    pub reason: PhoneRejection,
}

/// Malformed or missing input. Never reaches the media platform.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field {field} must be less than {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("Invalid request body: {0}")]
    MalformedBody(String),

    #[error(transparent)]
    Phone(#[from] PhoneError),
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("{0}")]
    DispatchFailed(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Stable machine-readable kind carried on failed outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ValidationError,
    AuthenticationError,
    DispatchFailed,
    ConfigurationError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "validation_error",
            Self::AuthenticationError => "authentication_error",
            Self::DispatchFailed => "dispatch_failed",
            Self::ConfigurationError => "configuration_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DispatchError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Authentication(_) => 401,
            Self::DispatchFailed(_) | Self::Configuration(_) => 500,
        }
    }

    /// Category string exposed in API error bodies
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Validation error",
            Self::Authentication(_) => "Invalid or missing API key",
            Self::DispatchFailed(_) => "Dispatch failed",
            Self::Configuration(_) => "Configuration error",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::Authentication(_) => ErrorKind::AuthenticationError,
            Self::DispatchFailed(_) => ErrorKind::DispatchFailed,
            Self::Configuration(_) => ErrorKind::ConfigurationError,
        }
    }
}

impl From<PhoneError> for DispatchError {
    fn from(err: PhoneError) -> Self {
        DispatchError::Validation(ValidationError::Phone(err))
    }
}
