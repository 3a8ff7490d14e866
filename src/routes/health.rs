use axum::{routing::get, Json, Router};
use chrono::Utc;

use crate::models::{HealthResponse, RootResponse};

pub fn router() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Person registry is running".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "running".to_string(),
    })
}
