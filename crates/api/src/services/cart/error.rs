//! Cart error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Menu item id, name, price, restaurant id or name is missing.
    #[error("missing required cart item fields")]
    MissingFields,

    /// Quantity is absent, negative or above the per-item limit.
    #[error("invalid quantity")]
    InvalidQuantity,

    /// A text field is wider than its column.
    #[error("{field} must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    /// Price is negative, too large or has sub-cent precision.
    #[error("invalid price: {0}")]
    InvalidPrice(#[from] feastflow_core::PriceError),

    /// The user has no cart yet.
    #[error("cart not found")]
    CartNotFound,

    /// The cart holds no item with that menu item id.
    #[error("item not found in cart")]
    ItemNotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
