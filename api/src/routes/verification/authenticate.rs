use actix_web::{web, HttpResponse};

use pv_core::repositories::KeyValueBackend;
use pv_core::services::CodeGenerator;
use pv_shared::phone::mask_phone_number;

use crate::app::AppState;
use crate::dto::{AuthenticateRequest, SuccessResponse};
use crate::handlers::{bad_request, handle_verification_error};

use super::{code_from_body, phone_from_body};

/// Handler for POST /api/authenticate
///
/// # Request Body
///
/// ```json
/// { "phoneNumber": "5551234567", "code": "QWERTY" }
/// ```
///
/// The code is upper-cased before it reaches the store, which compares exactly.
///
/// # Responses
/// - 200 `{"success": true}` - the number is verified
/// - 400 `{"error": "..."}` - missing field, not registered, invalid code
/// - 503 `{"error": "..."}` - backend unavailable
pub async fn authenticate<B, G>(
    state: web::Data<AppState<B, G>>,
    body: web::Json<AuthenticateRequest>,
) -> HttpResponse
where
    B: KeyValueBackend + 'static,
    G: CodeGenerator + 'static,
{
    let Some(phone) = phone_from_body(body.phone_number.as_deref()) else {
        return bad_request("Missing phone number");
    };
    let Some(code) = code_from_body(body.code.as_deref()) else {
        return bad_request("Missing code");
    };

    tracing::info!(phone = %mask_phone_number(&phone), "Processing authenticate request");

    match state.store.authenticate(&phone, &code).await {
        Ok(()) => HttpResponse::Ok().json(SuccessResponse::ok()),
        Err(error) => handle_verification_error(&error),
    }
}
