//! Kubernetes network diagnostics route handlers.
//!
//! Both routes are public and read-only.

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::services::network;
use crate::state::AppState;

/// Resolve and probe the cluster services.
///
/// Probe failures land in the report; the request itself always succeeds.
pub async fn diagnostics(State(state): State<AppState>) -> impl IntoResponse {
    let diagnostics =
        network::run_diagnostics(&state.config().network, state.pool(), state.http()).await;

    Json(json!({
        "success": true,
        "message": "Kubernetes network diagnostics completed",
        "diagnostics": diagnostics,
    }))
}

pub async fn services(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "serviceDiscovery": network::service_discovery(state.config()),
    }))
}
