//! Health check handler

use axum::Json;
use intel_response_core::constants::{ENGINE_NAME, ENGINE_VERSION};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    engine: &'static str,
    version: &'static str,
    timestamp: i64,
}

pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        engine: ENGINE_NAME,
        version: ENGINE_VERSION,
        timestamp: chrono::Utc::now().timestamp(),
    })
}
