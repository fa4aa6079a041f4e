//! Cache module for the Redis-backed verification store
//!
//! Provides the Redis client with retry logic and its implementation of the
//! core key-value backend contract.

pub mod kv_backend;
pub mod redis_client;
mod scripts;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;

// Re-export commonly used types
pub use pv_shared::config::CacheConfig;
