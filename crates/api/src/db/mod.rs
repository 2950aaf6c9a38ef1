//! Database operations for the FeastFlow `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `users` - Accounts with their role and Argon2 password hash
//! - `restaurants`, `orders`, `audit_log` - Read by the dashboard only
//! - `cart` - One row per user, scoped to at most one restaurant
//! - `cart_items` - Menu item snapshots, unique per `(cart_id, menu_item_id)`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p feastflow-cli -- migrate
//! ```

pub mod carts;
pub mod dashboard;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use carts::CartRepository;
pub use dashboard::DashboardRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A value did not fit its column or failed a range check.
    #[error("value out of range: {0}")]
    OutOfRange(String),
}

/// SQLSTATE codes for values a column cannot hold.
const RANGE_CODES: [&str; 3] = [
    "22001", // string_data_right_truncation
    "22003", // numeric_value_out_of_range
    "23514", // check_violation
];

impl RepositoryError {
    /// Classify a write error, separating range rejections from other failures.
    pub(crate) fn from_write(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.code().is_some_and(|code| RANGE_CODES.contains(&&*code))
        {
            return Self::OutOfRange(db_err.message().to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Round-trip a trivial query and report how long it took.
///
/// # Errors
///
/// Returns `sqlx::Error` if the store is unreachable.
pub async fn ping(pool: &PgPool) -> Result<Duration, sqlx::Error> {
    let started = std::time::Instant::now();
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(started.elapsed())
}
