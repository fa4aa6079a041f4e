//! Phone number identity key.

use serde::{Deserialize, Serialize};
use std::fmt;

use pv_shared::phone::{is_digits_only, mask_phone_number};

use crate::errors::VerificationError;

/// A digits-only phone number, the identity key for every store lookup.
///
/// Formatting is stripped by the caller; this type only checks that it was.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a phone number, rejecting anything that is not a non-empty run of ASCII digits
    pub fn parse(raw: &str) -> Result<Self, VerificationError> {
        if is_digits_only(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(VerificationError::InvalidPhoneNumber)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masked form safe for logs
    pub fn masked(&self) -> String {
        mask_phone_number(&self.0)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = VerificationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}
