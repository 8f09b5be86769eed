//! Login route handler.
//!
//! Login is a single stateless existence check: the credential procedure
//! either returns a row or it does not. No session or token is issued.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use customer_desk_core::LoginCredentials;

use crate::db::Store;
use crate::extract::{Payload, PayloadRejection};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid username or password";
const DATABASE_ERROR: &str = "Database error";

/// Body of every `POST /login` response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl LoginResponse {
    const fn accepted() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    const fn rejected(message: &'static str) -> Self {
        Self {
            success: false,
            message: Some(message),
        }
    }
}

/// Handle login submission.
///
/// POST /login
///
/// Accepts JSON or a URL-encoded form. A missing or undecodable body is
/// treated as empty credentials and left for the procedure to reject.
pub async fn login<S: Store>(
    State(state): State<AppState<S>>,
    body: Result<Payload<LoginCredentials>, PayloadRejection>,
) -> Response {
    let credentials = match body {
        Ok(Payload(credentials)) => credentials,
        Err(rejection) => {
            tracing::debug!(detail = rejection.detail(), "Undecodable login body");
            LoginCredentials::default()
        }
    };

    match state.store().check_login(&credentials).await {
        Ok(true) => {
            tracing::info!(username = ?credentials.bounded_username(), "Login accepted");
            (StatusCode::OK, Json(LoginResponse::accepted())).into_response()
        }
        Ok(false) => {
            tracing::info!(username = ?credentials.bounded_username(), "Login rejected");
            (
                StatusCode::UNAUTHORIZED,
                Json(LoginResponse::rejected(INVALID_CREDENTIALS)),
            )
                .into_response()
        }
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(error = %e, sentry_event_id = %event_id, "Login check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(LoginResponse::rejected(DATABASE_ERROR)),
            )
                .into_response()
        }
    }
}
