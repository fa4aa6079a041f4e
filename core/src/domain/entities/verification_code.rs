//! One-time verification code entity.

use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::VerificationError;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Characters a verification code is drawn from
pub const CODE_ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A 6-letter uppercase one-time code
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Parse a well-formed code. Returns `None` for the wrong length or any
    /// character outside `A`-`Z`.
    pub fn parse(raw: &str) -> Option<Self> {
        if Self::is_well_formed(raw) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    /// Check length and alphabet without allocating
    pub fn is_well_formed(raw: &str) -> bool {
        raw.len() == CODE_LENGTH && raw.bytes().all(|b| b.is_ascii_uppercase())
    }

    pub(crate) fn from_alphabet_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self(
            indices
                .into_iter()
                .map(|i| CODE_ALPHABET[i % CODE_ALPHABET.len()] as char)
                .collect(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for VerificationCode {
    type Error = VerificationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_well_formed(&value) {
            Ok(Self(value))
        } else {
            Err(VerificationError::InvalidCode)
        }
    }
}

impl From<VerificationCode> for String {
    fn from(code: VerificationCode) -> Self {
        code.0
    }
}

// Codes are secrets; keep them out of debug logs.
impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerificationCode(******)")
    }
}

/// Exact, case-sensitive comparison that does not short-circuit on the first
/// differing byte.
pub fn codes_match(stored: &str, submitted: &str) -> bool {
    stored.len() == submitted.len() && constant_time_eq(stored.as_bytes(), submitted.as_bytes())
}
