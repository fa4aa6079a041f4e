//! Verification store implementation

use std::sync::Arc;

use crate::domain::entities::{PhoneNumber, VerificationStatus};
use crate::errors::{BackendError, VerificationError, VerificationResult};
use crate::repositories::{ConditionalSet, KeyValueBackend, Promotion};
use crate::services::code_generator::CodeGenerator;

use super::config::VerificationStoreConfig;

/// Phone-number verification state machine over a key-value backend.
///
/// The store holds no mutable state of its own; all state lives in the
/// backend, so any number of instances can serve the same backend.
pub struct VerificationStore<B: KeyValueBackend, G: CodeGenerator> {
    /// Backend holding pending codes and the verified set
    backend: Arc<B>,
    /// Source of one-time codes
    generator: G,
    /// Key layout
    config: VerificationStoreConfig,
}

impl<B: KeyValueBackend, G: CodeGenerator> VerificationStore<B, G> {
    /// Create a new verification store
    ///
    /// # Arguments
    ///
    /// * `backend` - Key-value backend implementation
    /// * `generator` - One-time code generator
    /// * `config` - Key layout
    pub fn new(backend: Arc<B>, generator: G, config: VerificationStoreConfig) -> Self {
        Self {
            backend,
            generator,
            config,
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn config(&self) -> &VerificationStoreConfig {
        &self.config
    }

    /// Issue a pending code for an unregistered phone number
    ///
    /// Checks, in order: an outstanding pending code fails with
    /// `AlreadyRegistered`, membership in the verified set fails with
    /// `AlreadyVerified`. The check and the write are one atomic backend call.
    ///
    /// Delivering the code to the user is outside this store; it only
    /// persists it.
    pub async fn register(&self, phone: &str) -> VerificationResult<()> {
        let phone = PhoneNumber::parse(phone)?;
        let code = self.generator.generate();
        let key = self.config.pending_key(&phone);

        let outcome = self
            .backend
            .set_if_absent_unless_member(
                &key,
                code.as_str(),
                &self.config.verified_set,
                phone.as_str(),
            )
            .await
            .map_err(|e| Self::backend_failure(&phone, "register", e))?;

        match outcome {
            ConditionalSet::Written => {
                tracing::info!(
                    phone = %phone.masked(),
                    event = "code_issued",
                    "Issued verification code"
                );
                Ok(())
            }
            ConditionalSet::KeyExists => {
                tracing::warn!(
                    phone = %phone.masked(),
                    event = "already_registered",
                    "Registration rejected, code already pending"
                );
                Err(VerificationError::AlreadyRegistered)
            }
            ConditionalSet::AlreadyMember => {
                tracing::warn!(
                    phone = %phone.masked(),
                    event = "already_verified",
                    "Registration rejected, number already verified"
                );
                Err(VerificationError::AlreadyVerified)
            }
        }
    }

    /// Consume the pending code and mark the number verified
    ///
    /// Comparison is exact and case-sensitive; callers normalize case first.
    /// A wrong code leaves the pending code in place so the user can retry.
    /// On a match the pending code is removed and the number is added to the
    /// verified set, in that order, as one atomic backend call.
    pub async fn authenticate(&self, phone: &str, code: &str) -> VerificationResult<()> {
        let phone = PhoneNumber::parse(phone)?;
        let key = self.config.pending_key(&phone);

        let outcome = self
            .backend
            .take_if_equal_and_add(&key, code, &self.config.verified_set, phone.as_str())
            .await
            .map_err(|e| Self::backend_failure(&phone, "authenticate", e))?;

        match outcome {
            Promotion::Promoted => {
                tracing::info!(
                    phone = %phone.masked(),
                    event = "phone_verified",
                    "Phone number verified"
                );
                Ok(())
            }
            Promotion::Missing => {
                tracing::warn!(
                    phone = %phone.masked(),
                    event = "not_registered",
                    "Authentication attempted without a pending code"
                );
                Err(VerificationError::NotRegistered)
            }
            Promotion::Mismatch => {
                tracing::warn!(
                    phone = %phone.masked(),
                    event = "invalid_code",
                    "Submitted code does not match"
                );
                Err(VerificationError::InvalidCode)
            }
        }
    }

    /// Current position of a phone number in the state machine
    pub async fn status(&self, phone: &str) -> VerificationResult<VerificationStatus> {
        let phone = PhoneNumber::parse(phone)?;
        let key = self.config.pending_key(&phone);

        let pending = self
            .backend
            .exists(&key)
            .await
            .map_err(|e| Self::backend_failure(&phone, "status", e))?;
        if pending {
            return Ok(VerificationStatus::Pending);
        }

        let verified = self
            .backend
            .set_contains(&self.config.verified_set, phone.as_str())
            .await
            .map_err(|e| Self::backend_failure(&phone, "status", e))?;

        Ok(if verified {
            VerificationStatus::Verified
        } else {
            VerificationStatus::Unregistered
        })
    }

    fn backend_failure(
        phone: &PhoneNumber,
        operation: &'static str,
        error: BackendError,
    ) -> VerificationError {
        tracing::error!(
            phone = %phone.masked(),
            operation = operation,
            error = %error,
            event = "backend_failure",
            "Verification backend call failed"
        );
        error.into()
    }
}
