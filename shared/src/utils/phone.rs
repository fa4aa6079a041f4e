//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Digits only, at least one digit
static DIGITS_ONLY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

/// Strip every non-digit character, e.g. `(555) 123-4567` -> `5551234567`
pub fn normalize_phone_number(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Check that a phone number has already been reduced to digits
pub fn is_digits_only(phone: &str) -> bool {
    DIGITS_ONLY_REGEX.is_match(phone)
}

/// Mask a phone number for logs (e.g., 555****4567)
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.len() >= 7 {
        format!(
            "{}****{}",
            &normalized[0..3],
            &normalized[normalized.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}
