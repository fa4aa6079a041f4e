//! Redis implementation of the core key-value backend contract
//!
//! Key layout (with the default verification config):
//! - `pending:{phone}` - string holding the outstanding code
//! - `verified` - set of verified phone numbers

use async_trait::async_trait;
use pv_core::errors::BackendError;
use pv_core::repositories::{ConditionalSet, KeyValueBackend, Promotion};

use crate::InfrastructureError;

use super::RedisClient;

impl From<InfrastructureError> for BackendError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Cache(e) if e.kind() == redis::ErrorKind::TypeError => {
                BackendError::Protocol(e.to_string())
            }
            other => BackendError::Unavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl KeyValueBackend for RedisClient {
    async fn exists(&self, key: &str) -> Result<bool, BackendError> {
        Ok(RedisClient::exists(self, key).await?)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(RedisClient::get(self, key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        Ok(RedisClient::set(self, key, value).await?)
    }

    async fn del(&self, key: &str) -> Result<(), BackendError> {
        RedisClient::delete(self, key).await?;
        Ok(())
    }

    async fn set_add(&self, set_name: &str, member: &str) -> Result<(), BackendError> {
        Ok(RedisClient::set_add(self, set_name, member).await?)
    }

    async fn set_contains(&self, set_name: &str, member: &str) -> Result<bool, BackendError> {
        Ok(RedisClient::set_contains(self, set_name, member).await?)
    }

    async fn set_if_absent_unless_member(
        &self,
        key: &str,
        value: &str,
        set_name: &str,
        member: &str,
    ) -> Result<ConditionalSet, BackendError> {
        let status = self.run_conditional_set(key, value, set_name, member).await?;
        conditional_set_from_status(status)
    }

    async fn take_if_equal_and_add(
        &self,
        key: &str,
        expected: &str,
        set_name: &str,
        member: &str,
    ) -> Result<Promotion, BackendError> {
        let status = self.run_take_and_promote(key, expected, set_name, member).await?;
        promotion_from_status(status)
    }
}

pub(crate) fn conditional_set_from_status(status: i64) -> Result<ConditionalSet, BackendError> {
    match status {
        0 => Ok(ConditionalSet::Written),
        1 => Ok(ConditionalSet::KeyExists),
        2 => Ok(ConditionalSet::AlreadyMember),
        other => Err(BackendError::Protocol(format!(
            "conditional set script returned {}",
            other
        ))),
    }
}

pub(crate) fn promotion_from_status(status: i64) -> Result<Promotion, BackendError> {
    match status {
        0 => Ok(Promotion::Promoted),
        1 => Ok(Promotion::Missing),
        2 => Ok(Promotion::Mismatch),
        other => Err(BackendError::Protocol(format!(
            "promotion script returned {}",
            other
        ))),
    }
}
