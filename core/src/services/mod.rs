//! Business services containing the verification use cases.

pub mod code_generator;
pub mod verification;

// Re-export commonly used types
pub use code_generator::{CodeGenerator, RandomCodeGenerator};
pub use verification::{VerificationStore, VerificationStoreConfig};
