//! Cart domain types.
//!
//! Serialized with the store's column names, which is the shape clients of
//! the cart endpoints consume.

use chrono::{DateTime, Utc};
use serde::Serialize;

use feastflow_core::{CartId, CartItemId, Price, UserId};

/// A user's cart. At most one exists per user.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    /// `None` exactly when the cart holds no items.
    pub restaurant_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of a cart: a snapshot of a menu item plus a quantity.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartItem {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub menu_item_id: String,
    pub menu_item_name: String,
    pub menu_item_price: Price,
    pub menu_item_description: Option<String>,
    pub menu_item_category: Option<String>,
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart together with its items, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct CartWithItems {
    #[serde(flatten)]
    pub cart: Cart,
    pub items: Vec<CartItem>,
}

/// A validated menu item snapshot to add to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub menu_item_id: String,
    pub menu_item_name: String,
    pub menu_item_price: Price,
    pub menu_item_description: Option<String>,
    pub menu_item_category: Option<String>,
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub quantity: i32,
}

/// What adding an item from some restaurant does to a cart's restaurant scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeChange {
    /// The cart is already scoped to the incoming restaurant.
    Keep,
    /// The cart has no restaurant yet and takes the incoming one.
    Assign,
    /// The cart belongs to another restaurant: its items are discarded and
    /// the scope moves to the incoming restaurant.
    Switch,
}

impl ScopeChange {
    /// Decide the scope change for an item from `incoming`.
    #[must_use]
    pub fn for_incoming(current: Option<&str>, incoming: &str) -> Self {
        match current {
            None => Self::Assign,
            Some(current) if current == incoming => Self::Keep,
            Some(_) => Self::Switch,
        }
    }
}
