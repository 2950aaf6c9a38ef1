//! Cart repository for database operations.
//!
//! Multi-statement operations run in a transaction holding a `FOR UPDATE`
//! lock on the user's cart row, so concurrent adds and clears for the same
//! user are serialized.

use sqlx::{PgPool, Postgres, Transaction};

use feastflow_core::{CartId, UserId};

use super::RepositoryError;
use crate::models::{Cart, CartItem, NewCartItem, ScopeChange};

const CART_COLUMNS: &str = "id, user_id, restaurant_id, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, cart_id, menu_item_id, menu_item_name, menu_item_price, \
                            menu_item_description, menu_item_category, restaurant_id, \
                            restaurant_name, quantity, created_at, updated_at";

/// Result of clearing a user's cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// Items were deleted and the restaurant scope reset.
    Cleared,
    /// The user never had a cart.
    NoCart,
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's cart, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(&format!(
            "SELECT {CART_COLUMNS} FROM cart WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(cart)
    }

    /// Get the user's cart, creating an empty one if none exists.
    ///
    /// Safe to call concurrently: the unique `user_id` constraint absorbs
    /// racing inserts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        ensure_cart(self.pool, user_id).await?;

        self.find_by_user(user_id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// List the items in a cart, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, cart_id: CartId) -> Result<Vec<CartItem>, RepositoryError> {
        let items = sqlx::query_as::<_, CartItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM cart_items WHERE cart_id = $1 ORDER BY created_at DESC"
        ))
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Add an item to the user's cart, creating the cart if needed.
    ///
    /// If the cart is scoped to a different restaurant its items are deleted
    /// first. Adding a menu item already in the cart increments its quantity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::OutOfRange` if the merged quantity fails the
    /// column check, `RepositoryError::Database` if any other statement
    /// fails. Either way the transaction is rolled back.
    pub async fn add_item(
        &self,
        user_id: UserId,
        item: &NewCartItem,
    ) -> Result<(CartItem, ScopeChange), RepositoryError> {
        ensure_cart(self.pool, user_id).await?;

        let mut tx = self.pool.begin().await?;
        let cart = lock_cart(&mut tx, user_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let change = ScopeChange::for_incoming(cart.restaurant_id.as_deref(), &item.restaurant_id);
        match change {
            ScopeChange::Keep => {}
            ScopeChange::Switch => {
                sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
                    .bind(cart.id)
                    .execute(&mut *tx)
                    .await?;
                set_restaurant(&mut tx, cart.id, Some(&item.restaurant_id)).await?;
            }
            ScopeChange::Assign => {
                set_restaurant(&mut tx, cart.id, Some(&item.restaurant_id)).await?;
            }
        }

        // A repeat add merges into the existing row instead of inserting
        let saved = sqlx::query_as::<_, CartItem>(&format!(
            r"
            INSERT INTO cart_items (
                cart_id, menu_item_id, menu_item_name, menu_item_price,
                menu_item_description, menu_item_category,
                restaurant_id, restaurant_name, quantity
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (cart_id, menu_item_id) DO UPDATE
            SET quantity = cart_items.quantity + EXCLUDED.quantity,
                updated_at = NOW()
            RETURNING {ITEM_COLUMNS}
            "
        ))
        .bind(cart.id)
        .bind(&item.menu_item_id)
        .bind(&item.menu_item_name)
        .bind(item.menu_item_price)
        .bind(item.menu_item_description.as_deref())
        .bind(item.menu_item_category.as_deref())
        .bind(&item.restaurant_id)
        .bind(&item.restaurant_name)
        .bind(item.quantity)
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;

        tx.commit().await?;

        Ok((saved, change))
    }

    /// Set the quantity of an item already in the cart.
    ///
    /// Returns `None` if the cart has no item with that menu item ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_quantity(
        &self,
        cart_id: CartId,
        menu_item_id: &str,
        quantity: i32,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let item = sqlx::query_as::<_, CartItem>(&format!(
            r"
            UPDATE cart_items
            SET quantity = $3, updated_at = NOW()
            WHERE cart_id = $1 AND menu_item_id = $2
            RETURNING {ITEM_COLUMNS}
            "
        ))
        .bind(cart_id)
        .bind(menu_item_id)
        .bind(quantity)
        .fetch_optional(self.pool)
        .await?;

        Ok(item)
    }

    /// Delete an item from the cart.
    ///
    /// Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_item(
        &self,
        cart_id: CartId,
        menu_item_id: &str,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND menu_item_id = $2")
            .bind(cart_id)
            .bind(menu_item_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every item in the user's cart and reset its restaurant scope.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction is rolled back.
    pub async fn clear(&self, user_id: UserId) -> Result<ClearOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let Some(cart) = lock_cart(&mut tx, user_id).await? else {
            return Ok(ClearOutcome::NoCart);
        };

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart.id)
            .execute(&mut *tx)
            .await?;
        set_restaurant(&mut tx, cart.id, None).await?;

        tx.commit().await?;

        Ok(ClearOutcome::Cleared)
    }
}

/// Insert an empty cart for the user unless one already exists.
async fn ensure_cart(pool: &PgPool, user_id: UserId) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO cart (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

async fn lock_cart(
    tx: &mut Transaction<'_, Postgres>,
    user_id: UserId,
) -> Result<Option<Cart>, sqlx::Error> {
    sqlx::query_as::<_, Cart>(&format!(
        "SELECT {CART_COLUMNS} FROM cart WHERE user_id = $1 FOR UPDATE"
    ))
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await
}

async fn set_restaurant(
    tx: &mut Transaction<'_, Postgres>,
    cart_id: CartId,
    restaurant_id: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE cart SET restaurant_id = $2, updated_at = NOW() WHERE id = $1")
        .bind(cart_id)
        .bind(restaurant_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
