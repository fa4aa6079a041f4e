//! Error-to-response mapping shared by all routes

pub mod error;

pub use error::{bad_request, handle_verification_error, json_error_handler, method_not_allowed};
