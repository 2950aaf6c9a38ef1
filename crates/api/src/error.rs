//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Server-side failures are
//! captured to Sentry and logged; the client only ever sees the JSON envelope
//! `{ "success": false, "message": "..." }`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::access::AccessError;
use crate::services::auth::AuthError;
use crate::services::cart::CartError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Request was refused by the access gate.
    #[error("Access error: {0}")]
    Access(#[from] AccessError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Malformed request from the client.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl AppError {
    /// Whether this error is the server's fault.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Database(_) | Self::Internal(_) => true,
            Self::Auth(err) => matches!(
                err,
                AuthError::Token(_) | AuthError::Repository(_) | AuthError::PasswordHash
            ),
            Self::Cart(err) => matches!(err, CartError::Repository(_)),
            Self::Access(_) | Self::Validation(_) | Self::NotFound(_) => false,
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        if self.is_server_error() {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }

        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::Access(err) => match err {
                AccessError::MissingToken | AccessError::InvalidToken => StatusCode::UNAUTHORIZED,
                AccessError::Forbidden(_) => StatusCode::FORBIDDEN,
            },
            Self::Cart(err) => match err {
                CartError::CartNotFound | CartError::ItemNotFound => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message. Never includes store error text.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Auth(err) => match err {
                AuthError::MissingFields => "Please provide all required fields".to_string(),
                AuthError::MissingCredentials => "Please provide email and password".to_string(),
                AuthError::InvalidEmail(_) => "Please provide a valid email address".to_string(),
                AuthError::InvalidRole(_) => "Invalid role".to_string(),
                AuthError::FieldTooLong { field, max } => {
                    format!("{field} must be at most {max} characters")
                }
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::UserNotFound => "User not found".to_string(),
                AuthError::UserAlreadyExists => "User already exists with this email".to_string(),
                AuthError::Token(_) | AuthError::Repository(_) | AuthError::PasswordHash => {
                    "Server error".to_string()
                }
            },
            Self::Access(err) => match err {
                AccessError::MissingToken => "Not authorized to access this route".to_string(),
                AccessError::InvalidToken => "Invalid or expired token".to_string(),
                AccessError::Forbidden(role) => {
                    format!("User role '{role}' is not authorized to access this route")
                }
            },
            Self::Cart(err) => match err {
                CartError::MissingFields => "Missing required fields".to_string(),
                CartError::InvalidQuantity => "Invalid quantity".to_string(),
                CartError::FieldTooLong { field, max } => {
                    format!("{field} must be at most {max} characters")
                }
                CartError::InvalidPrice(_) => "Invalid price".to_string(),
                CartError::CartNotFound => "Cart not found".to_string(),
                CartError::ItemNotFound => "Item not found in cart".to_string(),
                CartError::Repository(_) => "Server error".to_string(),
            },
            Self::Validation(msg) | Self::NotFound(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = Json(json!({
            "success": false,
            "message": self.message(),
        }));

        (self.status(), body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the authenticated caller.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Cart switched restaurant", Some(&[("restaurant_id", "r-12")][..]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
