//! Menu prices using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The amount has more than two decimal places.
    #[error("price must have at most {max} decimal places")]
    TooPrecise {
        /// Maximum allowed scale.
        max: u32,
    },
    /// The amount does not fit eight integer digits.
    #[error("price cannot exceed {max}")]
    TooLarge {
        /// Largest accepted amount.
        max: Decimal,
    },
    /// The input is not a decimal number.
    #[error("price is not a valid number")]
    Invalid,
}

/// A non-negative amount with at most two decimal places and at most
/// [`Price::MAX`].
///
/// Matches the `DECIMAL(10,2)` columns prices are stored in. Serializes as a
/// decimal string (`"12.50"`) and accepts either a JSON number or string.
///
/// ```
/// use feastflow_core::Price;
///
/// assert_eq!(Price::parse("12.5").unwrap().to_string(), "12.50");
/// assert!(Price::parse("-1").is_err());
/// assert!(Price::parse("1.999").is_err());
/// assert!(Price::parse("100000000").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Maximum number of decimal places.
    pub const MAX_SCALE: u32 = 2;

    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest amount a `DECIMAL(10,2)` column holds.
    pub const MAX: Self = Self(Decimal::from_parts(1_410_065_407, 2, 0, false, 2));

    /// Validate a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`], [`PriceError::TooPrecise`] or
    /// [`PriceError::TooLarge`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        if amount > Self::MAX.0 {
            return Err(PriceError::TooLarge { max: Self::MAX.0 });
        }
        let normalized = amount.normalize();
        if normalized.scale() > Self::MAX_SCALE {
            return Err(PriceError::TooPrecise {
                max: Self::MAX_SCALE,
            });
        }
        let mut fixed = normalized;
        fixed.rescale(Self::MAX_SCALE);
        Ok(Self(fixed))
    }

    /// Parse a price from its decimal string form.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Invalid`] if the string is not a number, or any
    /// error from [`Price::new`].
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount: Decimal = s.trim().parse().map_err(|_| PriceError::Invalid)?;
        Self::new(amount)
    }

    /// The amount, always at scale 2.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
