//! Brivas Dispatch Core - outbound call dispatch orchestration
//!
//! This crate provides:
//! - Phone number normalization for NANP numbers
//! - Deterministic call and lead identifiers
//! - LiveKit agent dispatch commands and clients (dry-run and execute)
//! - Batch dispatch with per-line failure isolation
//! - The error taxonomy shared by the gateway and the CLI

pub mod batch;
pub mod client;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod identifiers;
pub mod phone;

#[cfg(test)]
mod test_support;

pub use batch::{BatchEntry, BatchItem, BatchRunner, BatchSummary};
pub use client::{
    client_for, client_with_api, AgentDispatch, AgentDispatchApi, AgentDispatchRequest,
    DispatchClient, PlatformError,
};
pub use command::{CommandBuilder, DispatchCommand};
pub use config::{DispatchConfig, PlatformCredentials};
pub use dispatcher::{CallDispatcher, DispatchOptions};
pub use domain::{CallSession, DispatchMode, DispatchOutcome, LeadRequest, Origin};
pub use error::{DispatchError, ErrorKind, PhoneError, PhoneRejection, Result, ValidationError};
pub use identifiers::{make_identifiers, Identifiers};
pub use phone::{normalize, NormalizedPhone};
