use actix_web::{web, HttpResponse};

use pv_core::repositories::KeyValueBackend;
use pv_core::services::CodeGenerator;
use pv_shared::phone::mask_phone_number;

use crate::app::AppState;
use crate::dto::{RegisterRequest, SuccessResponse};
use crate::handlers::{bad_request, handle_verification_error};

use super::phone_from_body;

/// Handler for POST /api/register
///
/// # Request Body
///
/// ```json
/// { "phoneNumber": "5551234567" }
/// ```
///
/// # Responses
/// - 200 `{"success": true}` - a code is now pending for the number
/// - 400 `{"error": "..."}` - missing number, already registered, already verified
/// - 503 `{"error": "..."}` - backend unavailable
pub async fn register<B, G>(
    state: web::Data<AppState<B, G>>,
    body: web::Json<RegisterRequest>,
) -> HttpResponse
where
    B: KeyValueBackend + 'static,
    G: CodeGenerator + 'static,
{
    let Some(phone) = phone_from_body(body.phone_number.as_deref()) else {
        return bad_request("Missing phone number");
    };

    tracing::info!(phone = %mask_phone_number(&phone), "Processing register request");

    match state.store.register(&phone).await {
        Ok(()) => HttpResponse::Ok().json(SuccessResponse::ok()),
        Err(error) => handle_verification_error(&error),
    }
}
