//! Dashboard route handlers. Any signed-in role may read them.

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::dashboard::{ActivityQuery, DashboardService};
use crate::state::AppState;

pub async fn metrics(
    State(state): State<AppState>,
    _auth: RequireAuth,
) -> Result<impl IntoResponse> {
    let metrics = DashboardService::new(state.pool()).metrics().await?;

    Ok(Json(json!({ "success": true, "data": metrics })))
}

/// Synthetic service health rows with a live database latency.
pub async fn health(
    State(state): State<AppState>,
    _auth: RequireAuth,
) -> Result<impl IntoResponse> {
    let services = DashboardService::new(state.pool()).health().await?;

    Ok(Json(json!({
        "success": true,
        "data": { "services": services },
    })))
}

/// Recent audit-log activity, newest first.
pub async fn activity(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Query(query): Query<ActivityQuery>,
) -> Result<impl IntoResponse> {
    let entries = DashboardService::new(state.pool()).activity(&query).await?;

    Ok(Json(json!({ "success": true, "data": entries })))
}
