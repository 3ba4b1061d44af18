//! Health and service-info endpoints

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /health
///
/// Health check endpoint for monitoring and load balancers.
/// Does NOT require authentication.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "uic-wa".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET / - basic service info
pub async fn service_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "WhatsApp UIC Generator",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "operational",
    }))
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
