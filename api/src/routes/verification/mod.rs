//! Phone verification endpoints
//!
//! - `POST /api/register` issues a code for a phone number
//! - `POST /api/authenticate` submits the code

pub mod authenticate;
pub mod register;

pub use authenticate::authenticate;
pub use register::register;

use pv_shared::phone::normalize_phone_number;

/// Digits of a submitted phone number, or `None` when nothing usable was sent
pub(crate) fn phone_from_body(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    Some(normalize_phone_number(raw))
}

/// Trimmed, upper-cased code, or `None` when the field is missing or blank
pub(crate) fn code_from_body(raw: Option<&str>) -> Option<String> {
    let code = raw?.trim();
    if code.is_empty() {
        return None;
    }
    Some(code.to_ascii_uppercase())
}
