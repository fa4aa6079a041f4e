//! Shared utilities and common types for the phone verification service
//!
//! This crate provides functionality used across all server crates:
//! - Configuration types and the layered configuration loader
//! - Utility functions (phone normalization and masking)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, BackendKind, CacheConfig, ConfigError, Environment, LogFormat, LoggingConfig,
    ServerConfig, VerificationConfig,
};
pub use utils::phone;
