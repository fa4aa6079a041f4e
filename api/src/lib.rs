//! HTTP adapter for the phone verification service
//!
//! Thin actix-web layer: JSON bodies in, core calls, core errors out as
//! status codes. All verification rules live in `pv_core`.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod routes;
pub mod telemetry;

pub use app::{configure, create_app, AppState};
