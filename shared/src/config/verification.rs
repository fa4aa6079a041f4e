//! Verification store configuration module

use serde::{Deserialize, Serialize};

/// Key layout used by the verification store
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Prefix for pending-code keys; empty means the bare phone number is the key
    pub pending_prefix: String,

    /// Name of the set holding verified phone numbers
    pub verified_set: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            pending_prefix: String::from("pending"),
            verified_set: String::from("verified"),
        }
    }
}
