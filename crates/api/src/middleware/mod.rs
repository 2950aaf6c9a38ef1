//! HTTP middleware stack for the API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. CORS (single configured frontend origin, credentials allowed)
//! 3. `TraceLayer` (request span with `request_id` and `user_id` fields)
//! 4. Request ID (accept or generate `x-request-id`)
//! 5. Security headers
//!
//! Authentication is not a layer: handlers opt in through the
//! [`RequireRole`] extractor.

pub mod auth;
pub mod request_id;
pub mod security_headers;

pub use auth::{AnyRole, RequireAuth, RequireRole, RolePolicy};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
