//! Decimal money type.
//!
//! All prices in the shop are US dollars. Amounts are kept as
//! [`Decimal`] so that `49.99 * 2` is exactly `99.98`.

use core::fmt;
use core::iter::Sum;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::Quantity;

/// Errors produced when coercing user input into a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("price is required")]
    Empty,
    #[error("price must be a number")]
    NotANumber,
    #[error("price cannot be negative")]
    Negative,
    #[error("price cannot exceed {}", Price::MAX)]
    TooLarge,
}

/// A non-negative dollar amount with at most two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest amount a `NUMERIC(12, 2)` column holds: `9999999999.99`.
    pub const MAX: Self = Self(Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2));

    /// Coerce form or file input into a price.
    ///
    /// Accepts an optional leading `$` and surrounding whitespace. The value
    /// is rounded half away from zero to cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] for empty, non-numeric, negative or oversized
    /// input.
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();
        let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| PriceError::NotANumber)?;

        Self::from_decimal(amount)
    }

    /// Build a price from an already numeric amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero and
    /// [`PriceError::TooLarge`] for amounts above [`Price::MAX`].
    pub fn from_decimal(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_zero() {
            return Ok(Self::ZERO);
        }
        if amount.is_sign_negative() {
            return Err(PriceError::Negative);
        }
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if rounded > Self::MAX.0 {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(rounded))
    }

    /// Price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Line total for `quantity` units.
    #[must_use]
    pub fn times(self, quantity: Quantity) -> Self {
        Self(self.0 * Decimal::from(quantity.get()))
    }
}

/// Renders as `$49.99`.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
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
        Ok(Self::from_decimal(amount)?)
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_dollar_prefixed() {
        assert_eq!(Price::parse("49.99").unwrap(), Price::from_cents(4999));
        assert_eq!(Price::parse(" $12 ").unwrap(), Price::from_cents(1200));
    }

    #[test]
    fn test_parse_rounds_to_cents() {
        assert_eq!(Price::parse("10.005").unwrap(), Price::from_cents(1001));
        assert_eq!(Price::parse("1e1").unwrap(), Price::from_cents(1000));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(Price::parse(""), Err(PriceError::Empty));
        assert_eq!(Price::parse("$"), Err(PriceError::Empty));
        assert_eq!(Price::parse("cheap"), Err(PriceError::NotANumber));
        assert_eq!(Price::parse("-3"), Err(PriceError::Negative));
    }

    #[test]
    fn test_parse_caps_at_column_precision() {
        assert_eq!(Price::MAX.to_string(), "$9999999999.99");
        assert_eq!(Price::parse("9999999999.99").unwrap(), Price::MAX);
        assert_eq!(Price::parse("9999999999.994").unwrap(), Price::MAX);
        assert_eq!(Price::parse("9999999999.995"), Err(PriceError::TooLarge));
        assert_eq!(Price::parse("1e20"), Err(PriceError::TooLarge));
        assert_eq!(Price::parse("$10000000000"), Err(PriceError::TooLarge));
    }

    #[test]
    fn test_negative_zero_is_zero() {
        assert_eq!(Price::parse("-0").unwrap(), Price::ZERO);
    }

    #[test]
    fn test_line_total_after_increment() {
        let price = Price::parse("49.99").unwrap();
        let quantity = Quantity::ONE.increment();
        assert_eq!(price.times(quantity).to_string(), "$99.98");
    }

    #[test]
    fn test_display_pads_cents() {
        assert_eq!(Price::from_cents(500).to_string(), "$5.00");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::from_cents(1999), Price::from_cents(1)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(2000));
    }
}
