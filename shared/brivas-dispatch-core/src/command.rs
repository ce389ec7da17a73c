//! Agent dispatch command assembly
//!
//! The call agent treats a job whose metadata carries `phone_number` as an
//! outbound call and dials that number over the SIP trunk. Jobs without the key
//! are handled as interactive console sessions. Every command built here
//! therefore includes `phone_number`.

use serde_json::{json, Value};

use crate::config::DispatchConfig;
use crate::domain::{CallSession, LeadRequest, Origin};
use crate::phone::NormalizedPhone;

pub const CALL_TYPE: &str = "sales_outbound";

/// Everything the platform needs to create a room and dispatch the agent into it
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchCommand {
    pub session: CallSession,
    pub lead: LeadRequest,
    pub phone: NormalizedPhone,
    pub room_name: String,
    pub agent_name: String,
    pub metadata: Value,
}

impl DispatchCommand {
    /// Metadata as carried on the dispatch request (a JSON string)
    pub fn metadata_json(&self) -> String {
        self.metadata.to_string()
    }

    /// Equivalent `lk` CLI invocation, shown to operators in dry-run mode
    pub fn render_cli(&self) -> String {
        format!(
            "lk dispatch create --new-room --room-name {} --agent-name {} --metadata {}",
            shell_quote(&self.room_name),
            shell_quote(&self.agent_name),
            shell_quote(&self.metadata_json()),
        )
    }
}

/// Single-quote one POSIX shell word. Room names carry lead names verbatim.
fn shell_quote(word: &str) -> String {
    format!("'{}'", word.replace('\'', r"'\''"))
}

#[derive(Debug, Clone)]
pub struct CommandBuilder {
    sip_trunk_id: String,
    agent_name: String,
    agent_persona: String,
}

impl CommandBuilder {
    pub fn new(
        sip_trunk_id: impl Into<String>,
        agent_name: impl Into<String>,
        agent_persona: impl Into<String>,
    ) -> Self {
        Self {
            sip_trunk_id: sip_trunk_id.into(),
            agent_name: agent_name.into(),
            agent_persona: agent_persona.into(),
        }
    }

    pub fn from_config(config: &DispatchConfig) -> Self {
        Self::new(
            config.sip_trunk_id.clone(),
            config.agent_name.clone(),
            config.agent_persona.clone(),
        )
    }

    pub fn build(
        &self,
        session: CallSession,
        lead: &LeadRequest,
        phone: NormalizedPhone,
        origin: Origin,
    ) -> DispatchCommand {
        let metadata = json!({
            "phone_number": phone.e164(),
            "lead_id": session.lead_id,
            "first_name": lead.first_name,
            "last_name": lead.last_name,
            "address": lead.address,
            "call_type": CALL_TYPE,
            "agent_name": self.agent_persona,
            "sip_trunk_id": self.sip_trunk_id,
            "customer_info": {
                "first_name": lead.first_name,
                "last_name": lead.last_name,
                "address": lead.address,
            },
            "initiated_via": origin.as_str(),
            "timestamp": session.created_at.to_rfc3339(),
        });

        DispatchCommand {
            room_name: session.call_id.clone(),
            agent_name: self.agent_name.clone(),
            session,
            lead: lead.clone(),
            phone,
            metadata,
        }
    }
}
