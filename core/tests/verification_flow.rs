//! End-to-end verification flow through the public API

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pv_core::{
    CodeGenerator, InMemoryBackend, KeyValueBackend, RandomCodeGenerator, VerificationCode,
    VerificationError, VerificationStatus, VerificationStore, VerificationStoreConfig,
};
use pv_shared::config::VerificationConfig;

/// Hands out codes from a fixed list in turn
struct SequenceGenerator {
    codes: Vec<VerificationCode>,
    next: AtomicUsize,
}

impl SequenceGenerator {
    fn new(codes: &[&str]) -> Self {
        Self {
            codes: codes
                .iter()
                .map(|c| VerificationCode::parse(c).expect("well-formed code"))
                .collect(),
            next: AtomicUsize::new(0),
        }
    }
}

impl CodeGenerator for SequenceGenerator {
    fn generate(&self) -> VerificationCode {
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        self.codes[i % self.codes.len()].clone()
    }
}

#[tokio::test]
async fn test_two_numbers_verified_independently() {
    let backend = Arc::new(InMemoryBackend::new());
    let store = VerificationStore::new(
        backend.clone(),
        SequenceGenerator::new(&["ALPHAA", "BRAVOO"]),
        VerificationStoreConfig::default(),
    );

    store.register("5550000001").await.unwrap();
    store.register("5550000002").await.unwrap();

    // Each number only accepts its own code
    assert_eq!(
        store.authenticate("5550000001", "BRAVOO").await,
        Err(VerificationError::InvalidCode)
    );
    store.authenticate("5550000002", "BRAVOO").await.unwrap();
    store.authenticate("5550000001", "ALPHAA").await.unwrap();

    assert_eq!(store.status("5550000001").await.unwrap(), VerificationStatus::Verified);
    assert_eq!(store.status("5550000002").await.unwrap(), VerificationStatus::Verified);
    assert_eq!(
        store.status("5550000003").await.unwrap(),
        VerificationStatus::Unregistered
    );
}

#[tokio::test]
async fn test_stores_sharing_a_backend_see_the_same_state() {
    let backend = Arc::new(InMemoryBackend::new());
    let config = VerificationStoreConfig::from(&VerificationConfig::default());
    let first = VerificationStore::new(backend.clone(), RandomCodeGenerator::new(), config.clone());
    let second = VerificationStore::new(backend.clone(), RandomCodeGenerator::new(), config);

    first.register("5551234567").await.unwrap();
    assert_eq!(
        second.register("5551234567").await,
        Err(VerificationError::AlreadyRegistered)
    );

    let code = backend.get("pending:5551234567").await.unwrap().unwrap();
    second.authenticate("5551234567", &code).await.unwrap();

    assert_eq!(
        first.register("5551234567").await,
        Err(VerificationError::AlreadyVerified)
    );
}

#[tokio::test]
async fn test_custom_key_layout() {
    let backend = Arc::new(InMemoryBackend::new());
    let config = VerificationStoreConfig::from(&VerificationConfig {
        pending_prefix: "otp".to_string(),
        verified_set: "confirmed_numbers".to_string(),
    });
    let store = VerificationStore::new(
        backend.clone(),
        SequenceGenerator::new(&["QWERTY"]),
        config,
    );

    store.register("5551234567").await.unwrap();
    assert_eq!(
        backend.get("otp:5551234567").await.unwrap(),
        Some("QWERTY".to_string())
    );

    store.authenticate("5551234567", "QWERTY").await.unwrap();
    assert!(backend
        .set_contains("confirmed_numbers", "5551234567")
        .await
        .unwrap());
    assert!(!backend.set_contains("verified", "5551234567").await.unwrap());
}
