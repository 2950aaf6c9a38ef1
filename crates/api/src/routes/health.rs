//! Health, readiness and index endpoints.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde_json::json;

use crate::db;
use crate::state::AppState;

const SERVICE_NAME: &str = "feastflow-backend";
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Liveness check that also probes the database.
///
/// Returns 503 with `database: "disconnected"` if the store is unreachable.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match db::ping(state.pool()).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "success": true,
                "message": "FeastFlow API is running",
                "timestamp": Utc::now(),
                "service": SERVICE_NAME,
                "version": VERSION,
                "environment": state.config().environment,
                "database": "connected",
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "success": false,
                    "message": "Service unavailable",
                    "timestamp": Utc::now(),
                    "service": SERVICE_NAME,
                    "database": "disconnected",
                })),
            )
        }
    }
}

/// Readiness check for the orchestrator.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match db::ping(state.pool()).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "ready", "timestamp": Utc::now() })),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not_ready", "timestamp": Utc::now() })),
        ),
    }
}

/// API index listing the route groups.
pub async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "FeastFlow API",
        "version": VERSION,
        "endpoints": {
            "health": "/api/health",
            "auth": "/api/auth",
            "cart": "/api/cart",
            "dashboard": "/api/dashboard",
            "network": "/api/network",
        },
    }))
}
