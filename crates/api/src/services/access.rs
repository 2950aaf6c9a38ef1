//! Role-based access gate.
//!
//! Each route declares the exact set of roles it admits. Roles carry no
//! hierarchy: an admin only passes a gate that lists `Admin`.

use thiserror::Error;

use feastflow_core::{Role, UserId};

use super::auth::Claims;

/// The caller resolved from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.id,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Why a request was refused at the gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No token was presented.
    #[error("no token presented")]
    MissingToken,

    /// A token was presented but failed verification.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The caller's role is not admitted by the route.
    #[error("role {0} is not allowed")]
    Forbidden(Role),
}

/// Admit `identity` if its role is one of `allowed`.
///
/// # Errors
///
/// Returns `AccessError::MissingToken` when no identity was resolved and
/// `AccessError::Forbidden` when the role is not listed.
pub fn authorize<'a>(
    identity: Option<&'a Identity>,
    allowed: &[Role],
) -> Result<&'a Identity, AccessError> {
    let identity = identity.ok_or(AccessError::MissingToken)?;
    if allowed.contains(&identity.role) {
        Ok(identity)
    } else {
        Err(AccessError::Forbidden(identity.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> Identity {
        Identity {
            user_id: UserId::new(uuid::Uuid::nil()),
            email: "someone@feastflow.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_no_identity_is_unauthenticated() {
        assert_eq!(authorize(None, &Role::ALL), Err(AccessError::MissingToken));
    }

    #[test]
    fn test_listed_role_passes() {
        let admin = identity(Role::Admin);
        assert!(authorize(Some(&admin), &[Role::Admin]).is_ok());
        assert!(authorize(Some(&admin), &Role::ALL).is_ok());
    }

    #[test]
    fn test_no_role_hierarchy() {
        let admin = identity(Role::Admin);
        assert_eq!(
            authorize(Some(&admin), &[Role::RestaurantOwner]),
            Err(AccessError::Forbidden(Role::Admin))
        );

        let customer = identity(Role::Customer);
        assert_eq!(
            authorize(Some(&customer), &[Role::RestaurantOwner, Role::Admin]),
            Err(AccessError::Forbidden(Role::Customer))
        );
    }
}
