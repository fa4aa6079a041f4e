//! Domain entities

pub mod phone_number;
pub mod verification_code;
pub mod verification_status;


pub use phone_number::PhoneNumber;
pub use verification_code::{codes_match, VerificationCode, CODE_ALPHABET, CODE_LENGTH};
pub use verification_status::VerificationStatus;
