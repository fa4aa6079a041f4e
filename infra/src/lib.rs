//! # Infrastructure Layer
//!
//! Concrete implementations of the core's storage contract. The only
//! production backend is Redis, reached through [`cache::RedisClient`],
//! which implements [`pv_core::repositories::KeyValueBackend`].

pub mod cache;

pub use cache::RedisClient;

/// Configuration module for infrastructure services
pub mod config {
    //! Re-export of the shared cache configuration consumed by [`crate::cache::RedisClient`]

    pub use pv_shared::config::CacheConfig;
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
