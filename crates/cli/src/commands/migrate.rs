//! Database migration command.
//!
//! Migrations live in `crates/server/migrations/` and are embedded at
//! compile time:
//!
//! ```text
//! migrations/
//! ├── 20261016000001_create_customers.sql
//! ├── 20261016000002_create_worker_users.sql
//! └── 20261016000003_create_procedures.sql
//! ```

use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Configuration or connection failure.
    #[error("Database connection error: {0}")]
    Connect(String),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply every pending migration.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), MigrationError> {
    let pool = super::connect()
        .await
        .map_err(|e| MigrationError::Connect(e.to_string()))?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
