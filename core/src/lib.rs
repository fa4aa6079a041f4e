//! # PhoneVerify Core
//!
//! Core business logic for phone-number verification. This crate contains
//! the domain types, the verification state machine, the one-time code
//! generator, the key-value backend contract every storage implementation
//! must honor, and the error taxonomy surfaced to callers.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
