//! Cart service.
//!
//! A user owns at most one cart and a cart holds items from a single
//! restaurant. Adding an item from another restaurant empties the cart first.

mod error;

pub use error::CartError;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use feastflow_core::{Price, UserId};

use crate::db::RepositoryError;
use crate::db::carts::{CartRepository, ClearOutcome};
use crate::models::{CartItem, CartWithItems, NewCartItem, ScopeChange};

/// Longest menu item or restaurant id the store accepts.
pub const MAX_ID_LEN: usize = 50;
/// Longest menu item or restaurant name the store accepts.
pub const MAX_NAME_LEN: usize = 255;
/// Longest menu item category the store accepts.
pub const MAX_CATEGORY_LEN: usize = 100;
/// Most units of one menu item a cart may hold.
pub const MAX_QUANTITY: i32 = 999;

/// Add-to-cart request body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub menu_item_id: Option<String>,
    pub menu_item_name: Option<String>,
    pub menu_item_price: Option<Decimal>,
    pub menu_item_description: Option<String>,
    pub menu_item_category: Option<String>,
    pub restaurant_id: Option<String>,
    pub restaurant_name: Option<String>,
    pub quantity: Option<i64>,
}

impl TryFrom<AddItemRequest> for NewCartItem {
    type Error = CartError;

    fn try_from(req: AddItemRequest) -> Result<Self, Self::Error> {
        let (
            Some(menu_item_id),
            Some(menu_item_name),
            Some(price),
            Some(restaurant_id),
            Some(restaurant_name),
        ) = (
            present(req.menu_item_id),
            present(req.menu_item_name),
            req.menu_item_price,
            present(req.restaurant_id),
            present(req.restaurant_name),
        )
        else {
            return Err(CartError::MissingFields);
        };

        let quantity = match req.quantity {
            None => 1,
            Some(q) if q >= 1 => bounded_quantity(q)?,
            Some(_) => return Err(CartError::InvalidQuantity),
        };

        let menu_item_category = present(req.menu_item_category);
        check_len("menuItemId", &menu_item_id, MAX_ID_LEN)?;
        check_len("menuItemName", &menu_item_name, MAX_NAME_LEN)?;
        check_len("restaurantId", &restaurant_id, MAX_ID_LEN)?;
        check_len("restaurantName", &restaurant_name, MAX_NAME_LEN)?;
        if let Some(category) = &menu_item_category {
            check_len("menuItemCategory", category, MAX_CATEGORY_LEN)?;
        }

        Ok(Self {
            menu_item_id,
            menu_item_name,
            menu_item_price: Price::new(price)?,
            menu_item_description: present(req.menu_item_description),
            menu_item_category,
            restaurant_id,
            restaurant_name,
            quantity,
        })
    }
}

/// Quantity update request body.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: Option<i64>,
}

/// Result of setting an item's quantity.
#[derive(Debug, Clone)]
pub enum QuantityUpdate {
    /// The item now has the requested quantity.
    Updated(CartItem),
    /// A quantity of zero removed the item.
    Removed,
}

/// Cart service scoped to one database pool.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
        }
    }

    /// Get the user's cart and items, creating an empty cart if needed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` on storage failure.
    pub async fn get_cart(&self, user_id: UserId) -> Result<CartWithItems, CartError> {
        let cart = self.carts.get_or_create(user_id).await?;
        let items = self.carts.items(cart.id).await?;
        Ok(CartWithItems { cart, items })
    }

    /// Add an item, switching the cart's restaurant if it differs.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if merging would push the item
    /// past [`MAX_QUANTITY`], `CartError::Repository` on storage failure.
    pub async fn add_item(
        &self,
        user_id: UserId,
        item: &NewCartItem,
    ) -> Result<CartItem, CartError> {
        let (saved, change) = self
            .carts
            .add_item(user_id, item)
            .await
            .map_err(|e| match e {
                RepositoryError::OutOfRange(_) => CartError::InvalidQuantity,
                other => CartError::Repository(other),
            })?;

        if change == ScopeChange::Switch {
            tracing::info!(
                user_id = %user_id,
                restaurant_id = %item.restaurant_id,
                "cart switched restaurant, previous items discarded"
            );
            crate::error::add_breadcrumb(
                "cart",
                "Cart switched restaurant",
                Some(&[("restaurant_id", item.restaurant_id.as_str())][..]),
            );
        }

        Ok(saved)
    }

    /// Set an item's quantity; zero removes it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for a missing, negative or
    /// oversized quantity, `CartError::CartNotFound` if the user has no cart
    /// and `CartError::ItemNotFound` if the item is not in the cart.
    pub async fn update_quantity(
        &self,
        user_id: UserId,
        menu_item_id: &str,
        quantity: Option<i64>,
    ) -> Result<QuantityUpdate, CartError> {
        let quantity = validate_quantity(quantity)?;

        let cart = self
            .carts
            .find_by_user(user_id)
            .await?
            .ok_or(CartError::CartNotFound)?;

        if quantity == 0 {
            self.carts.remove_item(cart.id, menu_item_id).await?;
            return Ok(QuantityUpdate::Removed);
        }

        self.carts
            .set_quantity(cart.id, menu_item_id, quantity)
            .await?
            .map(QuantityUpdate::Updated)
            .ok_or(CartError::ItemNotFound)
    }

    /// Remove an item from the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartNotFound` or `CartError::ItemNotFound`.
    pub async fn remove_item(&self, user_id: UserId, menu_item_id: &str) -> Result<(), CartError> {
        let cart = self
            .carts
            .find_by_user(user_id)
            .await?
            .ok_or(CartError::CartNotFound)?;

        if self.carts.remove_item(cart.id, menu_item_id).await? {
            Ok(())
        } else {
            Err(CartError::ItemNotFound)
        }
    }

    /// Empty the cart and reset its restaurant.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` on storage failure.
    pub async fn clear(&self, user_id: UserId) -> Result<ClearOutcome, CartError> {
        Ok(self.carts.clear(user_id).await?)
    }
}

/// Check an update quantity: zero up to [`MAX_QUANTITY`].
fn validate_quantity(quantity: Option<i64>) -> Result<i32, CartError> {
    match quantity {
        Some(q) if q >= 0 => bounded_quantity(q),
        _ => Err(CartError::InvalidQuantity),
    }
}

fn bounded_quantity(quantity: i64) -> Result<i32, CartError> {
    i32::try_from(quantity)
        .ok()
        .filter(|q| *q <= MAX_QUANTITY)
        .ok_or(CartError::InvalidQuantity)
}

/// Reject values wider than their `VARCHAR` column.
fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), CartError> {
    if value.chars().count() > max {
        return Err(CartError::FieldTooLong { field, max });
    }
    Ok(())
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
