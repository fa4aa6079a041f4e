//! Process-local backend used for tests and single-instance development.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::domain::entities::codes_match;
use crate::errors::BackendError;

use super::traits::{ConditionalSet, KeyValueBackend, Promotion};

#[derive(Debug, Default)]
struct State {
    values: HashMap<String, String>,
    sets: HashMap<String, HashSet<String>>,
}

/// In-memory key-value backend.
///
/// Both compound operations run under a single write lock, so they are
/// atomic with respect to every other call on the same instance.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    state: RwLock<State>,
    unavailable: AtomicBool,
}

impl InMemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that fails every call, for exercising error paths
    pub fn unavailable() -> Self {
        let backend = Self::new();
        backend.set_unavailable(true);
        backend
    }

    /// Toggle failure mode
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), BackendError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable(
                "in-memory backend switched off".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueBackend for InMemoryBackend {
    async fn exists(&self, key: &str) -> Result<bool, BackendError> {
        self.check_available()?;
        Ok(self.state.read().await.values.contains_key(key))
    }

    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        self.check_available()?;
        Ok(self.state.read().await.values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        self.check_available()?;
        self.state
            .write()
            .await
            .values
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), BackendError> {
        self.check_available()?;
        self.state.write().await.values.remove(key);
        Ok(())
    }

    async fn set_add(&self, set_name: &str, member: &str) -> Result<(), BackendError> {
        self.check_available()?;
        self.state
            .write()
            .await
            .sets
            .entry(set_name.to_string())
            .or_default()
            .insert(member.to_string());
        Ok(())
    }

    async fn set_contains(&self, set_name: &str, member: &str) -> Result<bool, BackendError> {
        self.check_available()?;
        Ok(self
            .state
            .read()
            .await
            .sets
            .get(set_name)
            .is_some_and(|set| set.contains(member)))
    }

    async fn set_if_absent_unless_member(
        &self,
        key: &str,
        value: &str,
        set_name: &str,
        member: &str,
    ) -> Result<ConditionalSet, BackendError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        if state.values.contains_key(key) {
            return Ok(ConditionalSet::KeyExists);
        }
        if state
            .sets
            .get(set_name)
            .is_some_and(|set| set.contains(member))
        {
            return Ok(ConditionalSet::AlreadyMember);
        }
        state.values.insert(key.to_string(), value.to_string());
        Ok(ConditionalSet::Written)
    }

    async fn take_if_equal_and_add(
        &self,
        key: &str,
        expected: &str,
        set_name: &str,
        member: &str,
    ) -> Result<Promotion, BackendError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        match state.values.get(key) {
            None => return Ok(Promotion::Missing),
            Some(stored) if !codes_match(stored, expected) => return Ok(Promotion::Mismatch),
            Some(_) => {}
        }
        state.values.remove(key);
        state
            .sets
            .entry(set_name.to_string())
            .or_default()
            .insert(member.to_string());
        Ok(Promotion::Promoted)
    }
}
