//! Trait for key-value backend integration

use async_trait::async_trait;

use crate::domain::entities::codes_match;
use crate::errors::BackendError;

/// Outcome of [`KeyValueBackend::set_if_absent_unless_member`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalSet {
    /// The value was stored
    Written,
    /// The key already had a value; nothing was written
    KeyExists,
    /// The member is already in the guard set; nothing was written
    AlreadyMember,
}

/// Outcome of [`KeyValueBackend::take_if_equal_and_add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Promotion {
    /// The key matched, was deleted, and the member was added to the set
    Promoted,
    /// The key had no value
    Missing,
    /// The key's value differs from the expected one; nothing changed
    Mismatch,
}

/// Trait for the key-value store backing verification state
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// True if the key has any value set
    async fn exists(&self, key: &str) -> Result<bool, BackendError>;

    /// Current value for the key
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Unconditional write
    async fn set(&self, key: &str, value: &str) -> Result<(), BackendError>;

    /// Remove the key
    async fn del(&self, key: &str) -> Result<(), BackendError>;

    /// Add a member to a named set
    async fn set_add(&self, set_name: &str, member: &str) -> Result<(), BackendError>;

    /// Membership test
    async fn set_contains(&self, set_name: &str, member: &str) -> Result<bool, BackendError>;

    /// Write `value` under `key` only if the key is absent and `member` is not
    /// in `set_name`. The key check wins when both conditions fail.
    ///
    /// The default composes the primitives and is NOT atomic; backends shared
    /// between concurrent requests must override it.
    async fn set_if_absent_unless_member(
        &self,
        key: &str,
        value: &str,
        set_name: &str,
        member: &str,
    ) -> Result<ConditionalSet, BackendError> {
        if self.exists(key).await? {
            return Ok(ConditionalSet::KeyExists);
        }
        if self.set_contains(set_name, member).await? {
            return Ok(ConditionalSet::AlreadyMember);
        }
        self.set(key, value).await?;
        Ok(ConditionalSet::Written)
    }

    /// If `key` holds exactly `expected`, delete it and then add `member` to
    /// `set_name`.
    ///
    /// The default composes the primitives and is NOT atomic; backends shared
    /// between concurrent requests must override it.
    async fn take_if_equal_and_add(
        &self,
        key: &str,
        expected: &str,
        set_name: &str,
        member: &str,
    ) -> Result<Promotion, BackendError> {
        let stored = match self.get(key).await? {
            Some(stored) => stored,
            None => return Ok(Promotion::Missing),
        };
        if !codes_match(&stored, expected) {
            return Ok(Promotion::Mismatch);
        }
        self.del(key).await?;
        self.set_add(set_name, member).await?;
        Ok(Promotion::Promoted)
    }
}
