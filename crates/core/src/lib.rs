//! Customer Desk Core - Shared types library.
//!
//! This crate provides common types used across all Customer Desk components:
//! - `server` - HTTP API and static front-end
//! - `cli` - Command-line tools for migrations and seeding
//! - `integration-tests` - End-to-end tests against a running server
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. The optional `postgres` feature adds sqlx encoding for
//! [`CustomerRowId`] so it can be bound directly in queries.
//!
//! # Modules
//!
//! - [`types`] - Customer records, request payloads, and login credentials

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
