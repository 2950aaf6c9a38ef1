//! Cart route handlers.
//!
//! Every handler acts on the caller's own cart only.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde_json::json;

use crate::db::carts::ClearOutcome;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::NewCartItem;
use crate::services::cart::{AddItemRequest, CartService, QuantityUpdate, UpdateQuantityRequest};
use crate::state::AppState;

/// Show the cart, creating an empty one on first access.
pub async fn show(State(state): State<AppState>, auth: RequireAuth) -> Result<impl IntoResponse> {
    let cart = CartService::new(state.pool())
        .get_cart(auth.identity.user_id)
        .await?;

    Ok(Json(json!({ "success": true, "cart": cart })))
}

/// Add a menu item to the cart.
pub async fn add_item(
    State(state): State<AppState>,
    auth: RequireAuth,
    WithRejection(Json(req), _): WithRejection<Json<AddItemRequest>, AppError>,
) -> Result<impl IntoResponse> {
    let item = NewCartItem::try_from(req)?;
    let saved = CartService::new(state.pool())
        .add_item(auth.identity.user_id, &item)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Item added to cart",
        "item": saved,
    })))
}

/// Set an item's quantity. Zero removes it.
pub async fn update_item(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(item_id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateQuantityRequest>, AppError>,
) -> Result<impl IntoResponse> {
    let update = CartService::new(state.pool())
        .update_quantity(auth.identity.user_id, &item_id, req.quantity)
        .await?;

    let body = match update {
        QuantityUpdate::Updated(item) => json!({
            "success": true,
            "message": "Cart updated",
            "item": item,
        }),
        QuantityUpdate::Removed => json!({
            "success": true,
            "message": "Item removed from cart",
        }),
    };

    Ok(Json(body))
}

pub async fn remove_item(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(item_id): Path<String>,
) -> Result<impl IntoResponse> {
    CartService::new(state.pool())
        .remove_item(auth.identity.user_id, &item_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Item removed from cart",
    })))
}

pub async fn clear(State(state): State<AppState>, auth: RequireAuth) -> Result<impl IntoResponse> {
    let outcome = CartService::new(state.pool())
        .clear(auth.identity.user_id)
        .await?;

    let message = match outcome {
        ClearOutcome::Cleared => "Cart cleared",
        ClearOutcome::NoCart => "Cart already empty",
    };

    Ok(Json(json!({ "success": true, "message": message })))
}
