//! NANP phone number normalization

use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::{PhoneError, PhoneRejection};

/// Only North American numbers are dialed through the trunk
pub const COUNTRY_CODE: char = '1';

/// A validated US number: country code plus 10 significant digits
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPhone {
    significant: String,
}

impl NormalizedPhone {
    /// Country code followed by the 10 significant digits, no separators
    pub fn canonical(&self) -> String {
        format!("{}{}", COUNTRY_CODE, self.significant)
    }

    /// E.164 form, as dialed by the call agent
    pub fn e164(&self) -> String {
        format!("+{}{}", COUNTRY_CODE, self.significant)
    }

    /// The 10 digits after the country code
    pub fn significant_digits(&self) -> &str {
        &self.significant
    }
}

impl fmt::Display for NormalizedPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.e164())
    }
}

impl Serialize for NormalizedPhone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.e164())
    }
}

/// Parse loosely formatted input into a dialable number
pub fn normalize(raw: &str) -> Result<NormalizedPhone, PhoneError> {
    let reject = |reason| PhoneError {
        input: raw.to_string(),
        reason,
    };

    let mut digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    if digits.len() == 11 && digits.starts_with(COUNTRY_CODE) {
        digits.remove(0);
    }
    if digits.len() != 10 {
        return Err(reject(PhoneRejection::InvalidFormat));
    }

    let bytes = digits.as_bytes();
    if matches!(bytes[0], b'0' | b'1') {
        return Err(reject(PhoneRejection::InvalidAreaCode));
    }
    if matches!(bytes[3], b'0' | b'1') {
        return Err(reject(PhoneRejection::InvalidExchangeCode));
    }

    Ok(NormalizedPhone {
        significant: digits,
    })
}
