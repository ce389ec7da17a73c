//! Call and lead identifiers
//!
//! Identifiers are derived from the lead's name, the dialed number and the
//! dispatch second. Two dispatches for the same name and number within one
//! second get the same ids, so a webhook retried inside that second maps onto
//! the same room. Distinct leads sharing a name can collide the same way.

use chrono::{DateTime, Utc};

use crate::domain::{CallSession, DispatchMode};
use crate::phone::NormalizedPhone;

pub const SEPARATOR: &str = "_";
pub const CALL_ID_PREFIX: &str = "outbound_call";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifiers {
    pub call_id: String,
    pub lead_id: String,
}

impl Identifiers {
    pub fn into_session(self, mode: DispatchMode, created_at: DateTime<Utc>) -> CallSession {
        CallSession {
            call_id: self.call_id,
            lead_id: self.lead_id,
            mode,
            created_at,
        }
    }

    /// Replace the generated lead id with one supplied by the operator
    pub fn with_lead_id(mut self, lead_id: impl Into<String>) -> Self {
        self.lead_id = lead_id.into();
        self
    }
}

/// Lower-case a name and drop all whitespace
pub fn name_token(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn make_identifiers(
    phone: &NormalizedPhone,
    first: &str,
    last: &str,
    now: DateTime<Utc>,
) -> Identifiers {
    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
    let lead_id = [name_token(first), name_token(last), timestamp].join(SEPARATOR);
    let call_id = [CALL_ID_PREFIX, &phone.canonical(), &lead_id].join(SEPARATOR);

    Identifiers { call_id, lead_id }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phone::normalize;
    use chrono::TimeZone;

    fn at(secs: u32, nanos: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, secs).unwrap()
            + chrono::Duration::nanoseconds(nanos as i64)
    }

    #[test]
    fn test_identifier_layout() {
        let phone = normalize("(212) 555-1234").unwrap();
        let ids = make_identifiers(&phone, "John", "Smith", at(53, 0));

        assert_eq!(ids.lead_id, "john_smith_20250314_092653");
        assert_eq!(ids.call_id, "outbound_call_12125551234_john_smith_20250314_092653");
    }

    #[test]
    fn test_same_second_is_idempotent() {
        let phone = normalize("2125551234").unwrap();
        let first = make_identifiers(&phone, "Ada", "Lovelace", at(7, 1_000));
        let second = make_identifiers(&phone, "Ada", "Lovelace", at(7, 999_000_000));
        assert_eq!(first, second);

        let later = make_identifiers(&phone, "Ada", "Lovelace", at(8, 0));
        assert_ne!(first.call_id, later.call_id);
    }

    #[test]
    fn test_name_tokens_strip_whitespace_and_case() {
        assert_eq!(name_token("Mary Ann"), "maryann");
        assert_eq!(name_token(" DE\tLA Cruz "), "delacruz");

        let phone = normalize("2125551234").unwrap();
        let ids = make_identifiers(&phone, "Mary Ann", "Van Dyke", at(0, 0));
        assert!(ids.lead_id.starts_with("maryann_vandyke_"));
    }

    #[test]
    fn test_lead_override_keeps_call_id() {
        let phone = normalize("2125551234").unwrap();
        let ids = make_identifiers(&phone, "John", "Smith", at(1, 0));
        let call_id = ids.call_id.clone();

        let overridden = ids.with_lead_id("CRM-42");
        assert_eq!(overridden.lead_id, "CRM-42");
        assert_eq!(overridden.call_id, call_id);
    }
}
