//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! # Seed the default administrator
//! ff-cli user create -e admin@feastflow.com -p 'change-me-now' -f Admin -l User -r admin
//! ```
//!
//! # Environment Variables
//!
//! - `API_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

use feastflow_api::db::{RepositoryError, UserRepository, users::NewUser};
use feastflow_api::services::auth::{AuthError, hash_password};
use feastflow_core::{Email, EmailError, Role, RoleParseError, UserId};

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid role: {0}. Valid roles: customer, restaurant_owner, admin")]
    InvalidRole(#[from] RoleParseError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// User already exists.
    #[error("User already exists with email: {0}")]
    UserExists(String),

    #[error("Failed to hash password: {0}")]
    PasswordHash(#[from] AuthError),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

/// Arguments for [`create_user`].
pub struct CreateUser<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub role: &'a str,
}

/// Create a user with any role.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns `UserError::UserExists` if the email is taken.
pub async fn create_user(args: CreateUser<'_>) -> Result<UserId, UserError> {
    let role: Role = args.role.parse()?;
    let email = Email::parse(args.email)?;

    let database_url = super::database_url().map_err(UserError::MissingEnvVar)?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Creating user: {} ({})", email, role);

    let password_hash = hash_password(args.password.to_owned()).await?;

    let user = UserRepository::new(&pool)
        .create(NewUser {
            email: &email,
            password_hash: &password_hash,
            first_name: args.first_name,
            last_name: args.last_name,
            phone_number: None,
            role,
        })
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => UserError::UserExists(email.to_string()),
            other => UserError::Repository(other),
        })?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}, Role: {}",
        user.id,
        user.email,
        user.role
    );

    Ok(user.id)
}
