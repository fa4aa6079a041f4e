//! Integration tests for the Redis backend
//!
//! These tests require a running Redis instance to execute.
//! Run with: cargo test -p pv_infra --test redis_integration -- --ignored

use std::sync::Arc;

use pv_core::errors::VerificationError;
use pv_core::repositories::{ConditionalSet, KeyValueBackend, Promotion};
use pv_core::services::{RandomCodeGenerator, VerificationStore, VerificationStoreConfig};
use pv_infra::cache::{CacheConfig, RedisClient};

fn test_config() -> CacheConfig {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let mut config = CacheConfig::new(
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
    );
    config.token = std::env::var("REDIS_TOKEN").ok();
    config
}

/// Unique key layout per test so runs don't collide
fn store_config(test: &str) -> VerificationStoreConfig {
    VerificationStoreConfig {
        pending_prefix: format!("test:{}:pending", test),
        verified_set: format!("test:{}:verified", test),
    }
}

async fn cleanup(client: &RedisClient, config: &VerificationStoreConfig, phone: &str) {
    let _ = client
        .delete(&format!("{}:{}", config.pending_prefix, phone))
        .await;
    let _ = client.delete(&config.verified_set).await;
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_redis_connection() {
    let client = RedisClient::new(test_config()).await;
    assert!(client.is_ok(), "Failed to connect to Redis");
    assert!(client.unwrap().health_check().await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_primitive_operations() {
    let client = RedisClient::new(test_config()).await.unwrap();
    let key = "test:primitives:key";
    let set = "test:primitives:set";
    let _ = client.delete(key).await;
    let _ = client.delete(set).await;

    KeyValueBackend::set(&client, key, "VALUE").await.unwrap();
    assert!(KeyValueBackend::exists(&client, key).await.unwrap());
    assert_eq!(
        KeyValueBackend::get(&client, key).await.unwrap(),
        Some("VALUE".to_string())
    );
    KeyValueBackend::del(&client, key).await.unwrap();
    assert!(!KeyValueBackend::exists(&client, key).await.unwrap());

    KeyValueBackend::set_add(&client, set, "5551234567").await.unwrap();
    assert!(KeyValueBackend::set_contains(&client, set, "5551234567").await.unwrap());
    assert!(!KeyValueBackend::set_contains(&client, set, "5550000000").await.unwrap());

    let _ = client.delete(set).await;
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_scripts() {
    let client = RedisClient::new(test_config()).await.unwrap();
    let key = "test:scripts:pending:1";
    let set = "test:scripts:verified";
    let _ = client.delete(key).await;
    let _ = client.delete(set).await;

    assert_eq!(
        client.set_if_absent_unless_member(key, "ABCDEF", set, "1").await.unwrap(),
        ConditionalSet::Written
    );
    assert_eq!(
        client.set_if_absent_unless_member(key, "ZZZZZZ", set, "1").await.unwrap(),
        ConditionalSet::KeyExists
    );
    assert_eq!(
        client.take_if_equal_and_add(key, "abcdef", set, "1").await.unwrap(),
        Promotion::Mismatch
    );
    assert_eq!(
        client.take_if_equal_and_add(key, "ABCDEF", set, "1").await.unwrap(),
        Promotion::Promoted
    );
    assert_eq!(
        client.take_if_equal_and_add(key, "ABCDEF", set, "1").await.unwrap(),
        Promotion::Missing
    );
    assert_eq!(
        client.set_if_absent_unless_member(key, "ABCDEF", set, "1").await.unwrap(),
        ConditionalSet::AlreadyMember
    );

    let _ = client.delete(set).await;
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_verification_flow_against_redis() {
    let client = Arc::new(RedisClient::new(test_config()).await.unwrap());
    let config = store_config("flow");
    let phone = "5551234567";
    cleanup(&client, &config, phone).await;

    let store = VerificationStore::new(client.clone(), RandomCodeGenerator::new(), config.clone());
    let pending_key = format!("{}:{}", config.pending_prefix, phone);

    store.register(phone).await.unwrap();
    assert_eq!(
        store.register(phone).await,
        Err(VerificationError::AlreadyRegistered)
    );

    let code = client.get(&pending_key).await.unwrap().expect("pending code");
    let wrong = if code == "AAAAAA" { "BBBBBB" } else { "AAAAAA" };
    assert_eq!(
        store.authenticate(phone, wrong).await,
        Err(VerificationError::InvalidCode)
    );
    assert_eq!(client.get(&pending_key).await.unwrap(), Some(code.clone()));

    store.authenticate(phone, &code).await.unwrap();
    assert!(!client.exists(&pending_key).await.unwrap());
    assert!(client.set_contains(&config.verified_set, phone).await.unwrap());
    assert_eq!(
        store.register(phone).await,
        Err(VerificationError::AlreadyVerified)
    );

    cleanup(&client, &config, phone).await;
}
