//! Fixtures shared by unit tests

use chrono::Utc;

use crate::command::{CommandBuilder, DispatchCommand};
use crate::domain::{DispatchMode, LeadRequest, Origin};
use crate::identifiers::make_identifiers;
use crate::phone::normalize;

pub fn sample_lead(phone: &str) -> LeadRequest {
    LeadRequest::new(
        Some("John"),
        Some("O'Brien"),
        Some(phone),
        Some("123 Oak Street, Springfield, IL 62701"),
    )
    .unwrap()
}

pub fn sample_command(mode: DispatchMode, origin: Origin) -> DispatchCommand {
    build(sample_lead("(212) 555-1234"), mode, origin)
}

/// Command for a lead with arbitrary (possibly hostile) names
pub fn sample_command_for(first: &str, last: &str, mode: DispatchMode) -> DispatchCommand {
    let lead = LeadRequest::new(Some(first), Some(last), Some("2125551234"), Some("1 Main St"))
        .unwrap();
    build(lead, mode, Origin::WebApi)
}

fn build(lead: LeadRequest, mode: DispatchMode, origin: Origin) -> DispatchCommand {
    let phone = normalize(&lead.phone_number).unwrap();
    let now = Utc::now();
    let session = make_identifiers(&phone, &lead.first_name, &lead.last_name, now)
        .into_session(mode, now);

    CommandBuilder::new("ST_trunk", "outbound_call_agent", "Jack").build(session, &lead, phone, origin)
}
