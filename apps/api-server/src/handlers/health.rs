//! Health check endpoint.

use actix_web::{HttpResponse, web};
use scribe_shared::{ApiResponse, HealthResponse};

use crate::state::AppState;

/// Health check endpoint - returns server status and the active store.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        storage: state.storage.as_str().to_string(),
    };

    HttpResponse::Ok().json(ApiResponse::ok(response))
}
