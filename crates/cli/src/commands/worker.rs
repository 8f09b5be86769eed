//! Worker (staff login) management.
//!
//! Passwords are hashed inside `PostgreSQL` with `pgcrypto`, so the login
//! procedure can compare them with `crypt()`.

use customer_desk_core::MAX_CREDENTIAL_CHARS;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Errors that can occur during worker operations.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Configuration or connection failure.
    #[error("Database connection error: {0}")]
    Connect(String),

    /// Query failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Empty or oversized username or password.
    #[error("Invalid {0}: must be 1 to {MAX_CREDENTIAL_CHARS} characters")]
    Invalid(&'static str),

    /// Login name already taken.
    #[error("Worker already exists: {0}")]
    Exists(String),
}

fn check_length(field: &'static str, value: &str) -> Result<(), WorkerError> {
    let len = value.chars().count();
    if len == 0 || len > MAX_CREDENTIAL_CHARS {
        return Err(WorkerError::Invalid(field));
    }
    Ok(())
}

/// Create a worker login.
///
/// Credentials longer than the login check reads could never match, so
/// they are refused here.
///
/// # Returns
///
/// The new worker's row number.
///
/// # Errors
///
/// Returns `WorkerError` if validation fails, the name is taken, or the
/// database is unreachable.
pub async fn create(username: &str, password: &SecretString) -> Result<i32, WorkerError> {
    check_length("username", username)?;
    check_length("password", password.expose_secret())?;

    let pool = super::connect()
        .await
        .map_err(|e| WorkerError::Connect(e.to_string()))?;

    let result = sqlx::query_scalar::<_, i32>(
        "INSERT INTO worker_user (user_name, password_hash) \
         VALUES ($1, crypt($2, gen_salt('bf'))) \
         RETURNING worker_row",
    )
    .bind(username)
    .bind(password.expose_secret())
    .fetch_one(&pool)
    .await;

    match result {
        Ok(row) => Ok(row),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(WorkerError::Exists(username.to_owned()))
        }
        Err(e) => Err(e.into()),
    }
}
