use axum::Json;
use serde_json::{json, Value};

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Smart Recruiter API",
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/health",
    }))
}

/// GET /health
/// Liveness only; does not touch Postgres, Redis or S3.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
