use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Liveness probe with a constant body.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
