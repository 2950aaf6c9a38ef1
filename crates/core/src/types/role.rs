//! User roles.

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known [`Role`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct RoleParseError(pub String);

/// The role a user account holds.
///
/// New accounts are customers unless registration asks for something else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Places orders and owns a cart.
    #[default]
    Customer,
    /// Manages one or more restaurants.
    RestaurantOwner,
    /// Full access, including the dashboard.
    Admin,
}

impl Role {
    /// Every role, in privilege order.
    pub const ALL: [Self; 3] = [Self::Customer, Self::RestaurantOwner, Self::Admin];

    /// The wire and database name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::RestaurantOwner => "restaurant_owner",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "restaurant_owner" => Ok(Self::RestaurantOwner),
            "admin" => Ok(Self::Admin),
            _ => Err(RoleParseError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_customer() {
        assert_eq!(Role::default(), Role::Customer);
    }

    #[test]
    fn test_display_and_parse_agree() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_parse_unknown() {
        let err = "superuser".parse::<Role>().unwrap_err();
        assert_eq!(err.to_string(), "invalid role: superuser");
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Role::RestaurantOwner).unwrap();
        assert_eq!(json, "\"restaurant_owner\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }
}
