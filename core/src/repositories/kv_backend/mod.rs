//! Key-value backend contract
//!
//! The verification store keeps no state of its own. Everything lives in a
//! backend that offers six primitive operations plus two compound ones that
//! real implementations must make atomic.

mod memory;
mod traits;


pub use memory::InMemoryBackend;
pub use traits::{ConditionalSet, KeyValueBackend, Promotion};
