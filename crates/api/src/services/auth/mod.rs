//! Authentication service.
//!
//! Provides registration, password login and token issuance.

mod error;
pub mod token;

pub use error::AuthError;
pub use token::{Claims, TokenError, TokenService};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Deserialize;
use sqlx::PgPool;

use feastflow_core::{Email, Role, UserId};

use crate::db::RepositoryError;
use crate::db::users::{NewUser, UserRepository};
use crate::models::User;

/// Longest first or last name the store accepts.
pub const MAX_NAME_LEN: usize = 100;
/// Longest phone number the store accepts.
pub const MAX_PHONE_LEN: usize = 20;

/// Registration request body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<String>,
}

/// Login request body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A registration whose fields have all been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: Email,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role: Role,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = AuthError;

    fn try_from(req: RegisterRequest) -> Result<Self, Self::Error> {
        let (Some(email), Some(password), Some(first_name), Some(last_name)) = (
            present(req.email),
            present(req.password),
            present(req.first_name),
            present(req.last_name),
        ) else {
            return Err(AuthError::MissingFields);
        };

        let role = match present(req.role) {
            Some(role) => role.parse()?,
            None => Role::default(),
        };

        let phone_number = present(req.phone_number);
        check_len("firstName", &first_name, MAX_NAME_LEN)?;
        check_len("lastName", &last_name, MAX_NAME_LEN)?;
        if let Some(phone) = &phone_number {
            check_len("phoneNumber", phone, MAX_PHONE_LEN)?;
        }

        Ok(Self {
            email: Email::parse(&email)?,
            password,
            first_name,
            last_name,
            phone_number,
            role,
        })
    }
}

/// A signed token and the user it was issued for.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// Authentication service.
///
/// Handles user registration, login, and profile lookup.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenService) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
        }
    }

    /// Register a new user and sign them in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    /// Returns `AuthError::PasswordHash` or `AuthError::Repository` on server failures.
    pub async fn register(&self, registration: Registration) -> Result<AuthSession, AuthError> {
        let password_hash = hash_password(registration.password).await?;

        let user = self
            .users
            .create(NewUser {
                email: &registration.email,
                password_hash: &password_hash,
                first_name: &registration.first_name,
                last_name: &registration.last_name,
                phone_number: registration.phone_number.as_deref(),
                role: registration.role,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, role = %user.role, "user registered");

        let token = self.tokens.issue(&user)?;
        Ok(AuthSession { token, user })
    }

    /// Login with email and password.
    ///
    /// Unknown emails, inactive accounts and wrong passwords all produce the
    /// same `AuthError::InvalidCredentials`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if either field is absent.
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthSession, AuthError> {
        let (Some(email), Some(password)) = (present(req.email), present(req.password)) else {
            return Err(AuthError::MissingCredentials);
        };

        let email = Email::parse(&email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_active_with_password(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, password_hash).await?;

        let token = self.tokens.issue(&user)?;
        Ok(AuthSession { token, user })
    }

    /// Look up the user a token was issued for.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the account no longer exists.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

/// Treat absent and empty strings alike.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), AuthError> {
    if value.chars().count() > max {
        return Err(AuthError::FieldTooLong { field, max });
    }
    Ok(())
}

/// Hash a password using Argon2id on the blocking pool.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub async fn hash_password(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHash)
    })
    .await
    .map_err(|_| AuthError::PasswordHash)?
}

/// Verify a password against a stored hash on the blocking pool.
async fn verify_password(password: String, hash: String) -> Result<(), AuthError> {
    tokio::task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&hash).map_err(|_| AuthError::InvalidCredentials)?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)
    })
    .await
    .map_err(|_| AuthError::PasswordHash)?
}
