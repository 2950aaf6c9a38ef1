//! Domain models for the API.
//!
//! These are validated domain objects. Database row types live next to the
//! queries in [`crate::db`] and convert into these.

pub mod cart;
pub mod dashboard;
pub mod user;

pub use cart::{Cart, CartItem, CartWithItems, NewCartItem, ScopeChange};
pub use dashboard::{ActivityEntry, DashboardMetrics, ServiceHealth, ServiceStatus};
pub use user::{PublicUser, User};
