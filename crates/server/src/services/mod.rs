//! Business logic services.
//!
//! # Services
//!
//! - `customers` - Ordered dependency checks ahead of a customer delete

pub mod customers;

pub use customers::{DeleteOutcome, delete_customer};
