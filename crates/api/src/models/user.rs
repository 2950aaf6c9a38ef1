//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use feastflow_core::{Email, Role, UserId};

/// A FeastFlow account (domain type).
///
/// Never serialized directly; handlers expose [`PublicUser`].
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login email, unique and case-sensitive.
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role: Role,
    /// Inactive accounts cannot log in.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The public view of a user returned by the auth endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Public view without the creation timestamp (register/login responses).
    #[must_use]
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role,
            phone_number: self.phone_number.clone(),
            created_at: None,
        }
    }

    /// Public view including when the account was created (`/auth/me`).
    #[must_use]
    pub fn profile(&self) -> PublicUser {
        PublicUser {
            created_at: Some(self.created_at),
            ..self.public()
        }
    }
}
