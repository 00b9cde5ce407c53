//! Health check endpoint.

use crate::api::models::HealthResponse;
use axum::Json;

/// Handler for GET /health.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
