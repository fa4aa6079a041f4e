//! Per-number position in the verification state machine.

use serde::{Deserialize, Serialize};

/// Where a phone number stands in the verification lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// No pending code, not verified
    Unregistered,
    /// A code has been issued and awaits submission
    Pending,
    /// Verification completed; terminal
    Verified,
}

