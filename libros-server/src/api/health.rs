use crate::openapi::HEALTH_TAG;
use crate::state::AppState;
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

/// Basic health check handler
#[utoipa::path(
    get,
    path = "/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is healthy")
    )
)]
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
