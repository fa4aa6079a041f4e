use actix_web::{error::JsonPayloadError, HttpRequest, HttpResponse};

use pv_core::errors::VerificationError;

use crate::dto::ErrorResponse;

/// Convert a verification error to an HTTP response
///
/// Every domain error is a 400 carrying the error's message verbatim.
/// Backend failures are a 503 with a generic message; details go to the log.
pub fn handle_verification_error(error: &VerificationError) -> HttpResponse {
    if error.is_domain_error() {
        tracing::debug!(error_code = error.code(), "Verification request rejected");
        return bad_request(error.to_string());
    }

    let details = match error {
        VerificationError::BackendUnavailable { message } => message.as_str(),
        _ => "",
    };
    tracing::error!(
        error_code = error.code(),
        details = %details,
        "Verification backend unavailable"
    );
    HttpResponse::ServiceUnavailable().json(ErrorResponse::new(error.to_string()))
}

/// 400 with `{"error": message}`
pub fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new(message))
}

/// 405 for any method other than the route's own
pub async fn method_not_allowed(req: HttpRequest) -> HttpResponse {
    HttpResponse::MethodNotAllowed()
        .content_type("text/plain; charset=utf-8")
        .body(format!("Method {} Not Allowed", req.method()))
}

/// Render malformed JSON bodies in the same `{"error": ...}` shape
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected malformed JSON body");
    let message = match &err {
        JsonPayloadError::ContentType => "Expected a JSON body".to_string(),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body too large".to_string()
        }
        _ => "Malformed JSON body".to_string(),
    };
    actix_web::error::InternalError::from_response(err, bad_request(message)).into()
}
