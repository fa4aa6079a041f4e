//! Verification store module
//!
//! Owns every state transition of a phone number:
//!
//! ```text
//! UNREGISTERED --register()--> PENDING --authenticate(match)--> VERIFIED
//! PENDING      --register()--> AlreadyRegistered
//! VERIFIED     --register()--> AlreadyVerified
//! PENDING      --authenticate(mismatch)--> InvalidCode, code kept for retry
//! UNREGISTERED --authenticate(any)--> NotRegistered
//! ```

mod config;
mod store;

#[cfg(test)]
mod tests;

pub use config::VerificationStoreConfig;
pub use store::VerificationStore;
