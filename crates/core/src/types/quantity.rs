//! Cart line quantity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Number of units on a cart line. Never below one.
///
/// There is no way to decrement a line to zero; removing a line is a
/// separate operation that deletes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Quantity(i32);

impl Quantity {
    pub const ONE: Self = Self(1);

    /// Returns `None` for values below one.
    #[must_use]
    pub const fn new(value: i32) -> Option<Self> {
        if value >= 1 { Some(Self(value)) } else { None }
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// One more unit, saturating at `i32::MAX`.
    #[must_use]
    pub const fn increment(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// One fewer unit, or `None` when already at the floor of one.
    ///
    /// Callers treat `None` as "nothing to write".
    #[must_use]
    pub const fn decrement(self) -> Option<Self> {
        if self.0 > 1 { Some(Self(self.0 - 1)) } else { None }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for Quantity {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("quantity must be at least 1, got {value}"))
    }
}

impl From<Quantity> for i32 {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Quantity {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i32 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Quantity {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::try_from(raw)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Quantity {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_and_negative() {
        assert!(Quantity::new(0).is_none());
        assert!(Quantity::new(-4).is_none());
        assert_eq!(Quantity::new(3).unwrap().get(), 3);
    }

    #[test]
    fn test_decrement_clamps_at_one() {
        assert_eq!(Quantity::ONE.decrement(), None);

        let two = Quantity::ONE.increment();
        assert_eq!(two.decrement(), Some(Quantity::ONE));
    }

    #[test]
    fn test_decrement_never_goes_below_one() {
        let mut q = Quantity::new(5).unwrap();
        for _ in 0..10 {
            q = q.decrement().unwrap_or(q);
        }
        assert_eq!(q, Quantity::ONE);
    }

    #[test]
    fn test_increment_saturates() {
        let max = Quantity::new(i32::MAX).unwrap();
        assert_eq!(max.increment(), max);
    }

    #[test]
    fn test_serde_rejects_zero() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("2").unwrap().get(), 2);
    }
}
