//! Configuration for the verification store

use pv_shared::config::VerificationConfig;

use crate::domain::entities::PhoneNumber;

/// Backend key layout for the verification store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationStoreConfig {
    /// Prefix for pending-code keys; empty means the bare phone number is the key
    pub pending_prefix: String,
    /// Name of the set holding verified phone numbers
    pub verified_set: String,
}

impl Default for VerificationStoreConfig {
    fn default() -> Self {
        Self::from(&VerificationConfig::default())
    }
}

impl From<&VerificationConfig> for VerificationStoreConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            pending_prefix: config.pending_prefix.clone(),
            verified_set: config.verified_set.clone(),
        }
    }
}

impl VerificationStoreConfig {
    /// Key under which the pending code for `phone` is stored
    pub fn pending_key(&self, phone: &PhoneNumber) -> String {
        if self.pending_prefix.is_empty() {
            phone.as_str().to_string()
        } else {
            format!("{}:{}", self.pending_prefix, phone)
        }
    }
}
