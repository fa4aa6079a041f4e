//! Verification error taxonomy.
//!
//! Every variant except [`VerificationError::BackendUnavailable`] is an
//! expected, caller-facing condition; the `Display` text is the message shown
//! to the user.

use thiserror::Error;

/// Errors surfaced by [`crate::services::VerificationStore`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Phone number already registered")]
    AlreadyRegistered,

    #[error("Phone number already verified")]
    AlreadyVerified,

    #[error("Phone number not registered")]
    NotRegistered,

    #[error("Invalid code")]
    InvalidCode,

    #[error("Invalid phone number")]
    InvalidPhoneNumber,

    /// The backend kept failing after the client's retries were exhausted.
    /// `message` is for logs only and stays out of `Display`.
    #[error("Verification backend unavailable")]
    BackendUnavailable { message: String },
}

impl VerificationError {
    /// Stable machine-readable identifier
    pub fn code(&self) -> &'static str {
        match self {
            VerificationError::AlreadyRegistered => "ALREADY_REGISTERED",
            VerificationError::AlreadyVerified => "ALREADY_VERIFIED",
            VerificationError::NotRegistered => "NOT_REGISTERED",
            VerificationError::InvalidCode => "INVALID_CODE",
            VerificationError::InvalidPhoneNumber => "INVALID_PHONE_NUMBER",
            VerificationError::BackendUnavailable { .. } => "BACKEND_UNAVAILABLE",
        }
    }

    /// True for conditions caused by the caller's input or the number's state
    pub fn is_domain_error(&self) -> bool {
        !matches!(self, VerificationError::BackendUnavailable { .. })
    }
}

/// Errors reported by a [`crate::repositories::KeyValueBackend`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected backend response: {0}")]
    Protocol(String),
}

impl From<BackendError> for VerificationError {
    fn from(err: BackendError) -> Self {
        VerificationError::BackendUnavailable {
            message: err.to_string(),
        }
    }
}

pub type VerificationResult<T> = Result<T, VerificationError>;
