//! Authentication error types.

use thiserror::Error;

use super::token::TokenError;
use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Registration is missing email, password or a name.
    #[error("missing required registration fields")]
    MissingFields,

    /// Login is missing email or password.
    #[error("missing email or password")]
    MissingCredentials,

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] feastflow_core::EmailError),

    /// A registration field is wider than its column.
    #[error("{field} must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    /// Unknown role requested at registration.
    #[error("invalid role: {0}")]
    InvalidRole(#[from] feastflow_core::RoleParseError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Token signing failed.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
