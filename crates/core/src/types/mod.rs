//! Core types for Customer Desk.
//!
//! This module provides type-safe wrappers for the customer domain.

pub mod credential;
pub mod customer;
pub mod id;
pub mod lenient;

pub use credential::{LoginCredentials, MAX_CREDENTIAL_CHARS, truncate_chars};
pub use customer::{Customer, CustomerFields, CustomerInput, CustomerInputError};
pub use id::CustomerRowId;
pub use lenient::optional_text;
