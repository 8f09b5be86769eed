//! Customer record and request payload types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::CustomerRowId;
use super::lenient::optional_text;

/// A stored customer row as returned to API clients.
///
/// Optional columns serialize as `null` rather than being omitted, so clients
/// always see the full column set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Server-assigned surrogate key.
    pub row: CustomerRowId,
    /// Business key (unique).
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    /// Contact email (unique when present).
    pub email: Option<String>,
    pub company_name: Option<String>,
}

/// Errors raised while validating a [`CustomerInput`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CustomerInputError {
    /// `id` or `name` was absent or empty.
    #[error("ID and name are required.")]
    MissingIdentity,
}

/// Body of a create or update request, exactly as the client sent it.
///
/// Every field is optional at this stage so that a missing `id` or `name`
/// is reported as a validation error instead of a body rejection. Scalars
/// are accepted as text; `0` and `false` count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    #[serde(default, deserialize_with = "optional_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub company_name: Option<String>,
}

impl CustomerInput {
    /// Check the required fields and produce the values to write.
    ///
    /// Optional fields are carried through untouched: an absent field becomes
    /// `NULL`, an empty string stays an empty string.
    ///
    /// # Errors
    ///
    /// Returns `CustomerInputError::MissingIdentity` if `id` or `name` is
    /// absent or empty.
    pub fn validate(self) -> Result<CustomerFields, CustomerInputError> {
        let id = self.id.filter(|s| !s.is_empty());
        let name = self.name.filter(|s| !s.is_empty());

        let (Some(id), Some(name)) = (id, name) else {
            return Err(CustomerInputError::MissingIdentity);
        };

        Ok(CustomerFields {
            id,
            name,
            phone: self.phone,
            email: self.email,
            company_name: self.company_name,
        })
    }
}

/// The five editable customer columns after validation.
///
/// Used for both insert and full-replace update; there is no partial form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerFields {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company_name: Option<String>,
}

impl CustomerFields {
    /// Attach a row key, producing the record as it would be stored.
    #[must_use]
    pub fn into_customer(self, row: CustomerRowId) -> Customer {
        Customer {
            row,
            id: self.id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            company_name: self.company_name,
        }
    }
}
