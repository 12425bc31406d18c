use axum::Json;
use newsdesk_api::HealthResponse;

/// GET / — service banner.
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "News Analysis API is running" }))
}

/// GET /api/health — server liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "news-analysis-api".to_string(),
    })
}
