//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. Customer route handlers return
//! `Result<T, AppError>`; every error body is `{"message": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Required input missing; raised before any database call.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness or dependency conflict.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database operation failed. `message` is what the client sees.
    #[error("{message}: {source}")]
    Database {
        message: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl AppError {
    /// Wrap a repository failure with the client-facing message for this endpoint.
    #[must_use]
    pub const fn database(message: &'static str, source: RepositoryError) -> Self {
        Self::Database { message, source }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if let Self::Database { source, .. } = &self {
            let event_id = sentry::capture_error(source);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::BadRequest(msg) | Self::NotFound(msg) | Self::Conflict(msg) => msg.as_str(),
            Self::Database { message, .. } => *message,
        };

        (self.status(), Json(json!({ "message": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
