//! Surrogate key for customer rows.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Server-assigned surrogate key of a customer (`customer.row`).
///
/// Distinct from the business-facing customer `id`, which is free text chosen
/// by the caller. Path segments arrive as opaque text; use [`CustomerRowId::from_key`]
/// to find out whether a key can address a stored row at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerRowId(i32);

impl CustomerRowId {
    /// Create a row ID from its integer value.
    #[must_use]
    pub const fn new(row: i32) -> Self {
        Self(row)
    }

    /// Get the underlying i32 value.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Interpret an opaque path key as a row ID.
    ///
    /// Returns `None` when the key cannot denote any stored row, which callers
    /// treat the same as a row that does not exist.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        key.trim().parse().ok()
    }
}

impl fmt::Display for CustomerRowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CustomerRowId {
    type Err = core::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i32>().map(Self)
    }
}

impl From<i32> for CustomerRowId {
    fn from(row: i32) -> Self {
        Self(row)
    }
}

impl From<CustomerRowId> for i32 {
    fn from(row: CustomerRowId) -> Self {
        row.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for CustomerRowId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i32 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for CustomerRowId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let row = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(row))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for CustomerRowId {
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
    fn test_from_key_numeric() {
        assert_eq!(CustomerRowId::from_key("42"), Some(CustomerRowId::new(42)));
        assert_eq!(CustomerRowId::from_key(" 7 "), Some(CustomerRowId::new(7)));
    }

    #[test]
    fn test_from_key_rejects_non_numeric() {
        assert_eq!(CustomerRowId::from_key("abc"), None);
        assert_eq!(CustomerRowId::from_key(""), None);
        assert_eq!(CustomerRowId::from_key("99999999999"), None);
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&CustomerRowId::new(9)).unwrap();
        assert_eq!(json, "9");
    }
}
