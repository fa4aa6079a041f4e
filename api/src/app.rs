//! Application state and factory
//!
//! This module holds the shared state and builds the Actix-web application.
//! Middleware is added by the caller so tests can run the bare app.

use std::sync::Arc;

use actix_web::{
    body::BoxBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, HttpResponse,
};

use pv_core::repositories::KeyValueBackend;
use pv_core::services::{CodeGenerator, VerificationStore};

use crate::handlers::{json_error_handler, method_not_allowed};
use crate::routes::verification::{authenticate, register};

/// Application state that holds shared services
pub struct AppState<B: KeyValueBackend, G: CodeGenerator> {
    pub store: Arc<VerificationStore<B, G>>,
}

impl<B: KeyValueBackend, G: CodeGenerator> AppState<B, G> {
    pub fn new(store: VerificationStore<B, G>) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Register the verification routes and the health check
pub fn configure<B, G>(cfg: &mut web::ServiceConfig)
where
    B: KeyValueBackend + 'static,
    G: CodeGenerator + 'static,
{
    cfg.service(
        web::resource("/api/register")
            .route(web::post().to(register::<B, G>))
            .default_service(web::route().to(method_not_allowed)),
    )
    .service(
        web::resource("/api/authenticate")
            .route(web::post().to(authenticate::<B, G>))
            .default_service(web::route().to(method_not_allowed)),
    )
    .route("/health", web::get().to(health_check));
}

/// Create the application with all routes and the JSON body policy
pub fn create_app<B, G>(
    app_state: web::Data<AppState<B, G>>,
    max_payload_size: usize,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<BoxBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    B: KeyValueBackend + 'static,
    G: CodeGenerator + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(
            web::JsonConfig::default()
                .limit(max_payload_size)
                .error_handler(json_error_handler),
        )
        .configure(configure::<B, G>)
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "phone-verify-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "The requested resource was not found"
    }))
}
