//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! POST   /login                 - Worker credential check
//! GET    /manifest.webmanifest  - Web app manifest
//!
//! # Customers (JSON)
//! GET    /api/customers         - List, optional ?search=
//! POST   /api/customers         - Create
//! GET    /api/customers/{row}   - Fetch one
//! PUT    /api/customers/{row}   - Replace editable fields
//! DELETE /api/customers/{row}   - Delete when unreferenced
//! ```
//!
//! Health checks and static files are wired in [`crate::router`].

pub mod auth;
pub mod customers;
pub mod manifest;

use axum::{
    Router,
    routing::{get, post},
};

use crate::db::Store;
use crate::state::AppState;

/// Create the customer API router.
pub fn customer_routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route(
            "/",
            get(customers::index::<S>).post(customers::create::<S>),
        )
        .route(
            "/{row}",
            get(customers::show::<S>)
                .put(customers::update::<S>)
                .delete(customers::destroy::<S>),
        )
}

/// Create the main application router.
pub fn routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/login", post(auth::login::<S>))
        .route("/manifest.webmanifest", get(manifest::webmanifest::<S>))
        .nest("/api/customers", customer_routes::<S>())
}
