//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::{PgStore, Store};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// database store, created once at startup and injected into every handler.
pub struct AppState<S = PgStore> {
    inner: Arc<AppStateInner<S>>,
}

struct AppStateInner<S> {
    store: S,
    app_name: String,
}

impl<S: Store> AppState<S> {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `store` - Database interface (the shared pool in production)
    /// * `app_name` - Name advertised in the web app manifest
    pub fn new(store: S, app_name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                app_name: app_name.into(),
            }),
        }
    }

    /// Get a reference to the database store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.inner.store
    }

    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.inner.app_name
    }
}

// Manual impl: cloning shares the `Arc`, so `S` itself need not be `Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
