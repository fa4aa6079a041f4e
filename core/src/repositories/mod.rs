//! Storage contracts and their process-local implementation.

pub mod kv_backend;

pub use kv_backend::{ConditionalSet, InMemoryBackend, KeyValueBackend, Promotion};
