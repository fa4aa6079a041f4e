//! Mock implementations for testing the verification store

use crate::domain::entities::VerificationCode;
use crate::services::code_generator::CodeGenerator;

/// Always issues the same code
pub struct FixedCodeGenerator {
    code: VerificationCode,
}

impl FixedCodeGenerator {
    pub fn new(code: &str) -> Self {
        Self {
            code: VerificationCode::parse(code).expect("test code must be well formed"),
        }
    }
}

impl CodeGenerator for FixedCodeGenerator {
    fn generate(&self) -> VerificationCode {
        self.code.clone()
    }
}
