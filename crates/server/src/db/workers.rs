//! Worker login check against the credential procedure.

use sqlx::PgPool;
use tracing::instrument;

use customer_desk_core::LoginCredentials;

use super::RepositoryError;

/// Repository for staff login checks.
///
/// Passwords are never inspected here; the procedure decides what matches.
pub struct WorkerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WorkerRepository<'a> {
    /// Create a new worker repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Run `sp_check_worker_user_to_login` and report whether it matched.
    ///
    /// Each credential is bounded to 1000 characters; an absent value is
    /// bound as `NULL`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the procedure call fails.
    #[instrument(skip_all, fields(username = ?credentials.bounded_username()))]
    pub async fn check_login(&self, credentials: &LoginCredentials) -> Result<bool, RepositoryError> {
        let matches = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sp_check_worker_user_to_login($1, $2)",
        )
        .bind(credentials.bounded_username())
        .bind(credentials.bounded_password())
        .fetch_one(self.pool)
        .await?;

        Ok(matches > 0)
    }
}
