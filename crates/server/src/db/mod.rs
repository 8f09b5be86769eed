//! Database interface for the customer `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `customer` - Customers (`row` surrogate key, unique `id` and `e_mail`)
//! - `customer_user` - Users linked to a customer (`customer_row`)
//! - `order_recored` - Orders placed by a customer (`customer_id`)
//! - `worker_user` - Staff accounts checked by the login procedure
//!
//! ## Procedures
//!
//! - `sp_check_worker_user_to_login(user_name, password)` - login check
//! - `sp_search_customer_for_mangment(txt_search)` - customer search
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p customer-desk-cli -- migrate
//! ```

pub mod customers;
#[cfg(test)]
pub mod memory;
pub mod workers;

use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use thiserror::Error;

use customer_desk_core::{Customer, CustomerFields, CustomerRowId, LoginCredentials};

use crate::config::{DatabaseConfig, DatabaseTarget};

pub use customers::CustomerRepository;
pub use workers::WorkerRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unique constraint violation.
    #[error("constraint violation: duplicate {0}")]
    Conflict(ConflictField),

    /// Foreign key violation: the row is still referenced elsewhere.
    #[error("foreign key violation: {0}")]
    Referenced(String),
}

/// Which unique customer column a write collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictField {
    Id,
    Email,
    /// The constraint name could not be attributed to a column.
    Unknown,
}

impl ConflictField {
    /// Attribute a unique constraint name to a customer column.
    #[must_use]
    pub fn from_constraint(constraint: Option<&str>) -> Self {
        match constraint {
            Some(name) if name.contains("e_mail") || name.contains("email") => Self::Email,
            Some(name) if name.ends_with("_id_key") || name.ends_with("_id_idx") => Self::Id,
            _ => Self::Unknown,
        }
    }

    /// Client-facing explanation of the conflict.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Id => "A customer with this ID already exists.",
            Self::Email => "A customer with this email already exists.",
            Self::Unknown => "A customer with this ID or email already exists.",
        }
    }
}

impl std::fmt::Display for ConflictField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id => f.write_str("id"),
            Self::Email => f.write_str("email"),
            Self::Unknown => f.write_str("id or email"),
        }
    }
}

/// Translate a sqlx error into the repository taxonomy.
///
/// Unique and foreign key violations are classified; everything else stays
/// an opaque database error.
pub(crate) fn classify(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(ConflictField::from_constraint(db_err.constraint()));
        }
        if db_err.is_foreign_key_violation() {
            let constraint = db_err.constraint().unwrap_or("unknown").to_owned();
            return RepositoryError::Referenced(constraint);
        }
    }
    RepositoryError::Database(err)
}

/// Create a `PostgreSQL` connection pool.
///
/// Establishes one connection before returning, so an unreachable database
/// fails here rather than on the first request.
///
/// # Errors
///
/// Returns `sqlx::Error` if the options are invalid or the connection cannot
/// be established.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(connect_options(&config.target)?)
        .await
}

/// Build connect options from either a URL or individual parts.
fn connect_options(target: &DatabaseTarget) -> Result<PgConnectOptions, sqlx::Error> {
    match target {
        DatabaseTarget::Url(url) => url.expose_secret().parse(),
        DatabaseTarget::Parts(parts) => Ok(PgConnectOptions::new()
            .host(&parts.server)
            .port(parts.port)
            .username(&parts.user)
            .password(parts.password.expose_secret())
            .database(&parts.database)
            .ssl_mode(if parts.encrypt {
                PgSslMode::Require
            } else {
                PgSslMode::Prefer
            })),
    }
}

/// Everything the HTTP layer needs from the database.
///
/// Handlers are generic over this trait so they can run against
/// [`PgStore`] in production and an in-memory store in tests. Every method
/// is one round trip; none of them open a transaction.
pub trait Store: Send + Sync + 'static {
    /// Check that the database answers.
    fn ping(&self) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Run the credential-check procedure; `true` if it returned any row.
    fn check_login(
        &self,
        credentials: &LoginCredentials,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    /// Run the search procedure with a free-text term.
    fn search_customers(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<Vec<Customer>, RepositoryError>> + Send;

    /// Fetch one customer by row key.
    fn get_customer(
        &self,
        row: CustomerRowId,
    ) -> impl Future<Output = Result<Option<Customer>, RepositoryError>> + Send;

    /// Insert a customer and return it as stored.
    fn insert_customer(
        &self,
        fields: &CustomerFields,
    ) -> impl Future<Output = Result<Customer, RepositoryError>> + Send;

    /// Overwrite all editable fields of a customer; `None` if no row matched.
    fn update_customer(
        &self,
        row: CustomerRowId,
        fields: &CustomerFields,
    ) -> impl Future<Output = Result<Option<Customer>, RepositoryError>> + Send;

    /// Resolve a row key to the customer's business `id`.
    fn customer_business_id(
        &self,
        row: CustomerRowId,
    ) -> impl Future<Output = Result<Option<String>, RepositoryError>> + Send;

    /// Count `customer_user` rows linked to a customer row.
    fn count_linked_users(
        &self,
        row: CustomerRowId,
    ) -> impl Future<Output = Result<i64, RepositoryError>> + Send;

    /// Count `order_recored` rows placed under a business `id`.
    fn count_linked_orders(
        &self,
        customer_id: &str,
    ) -> impl Future<Output = Result<i64, RepositoryError>> + Send;

    /// Delete a customer row, returning the number of rows affected.
    fn delete_customer(
        &self,
        row: CustomerRowId,
    ) -> impl Future<Output = Result<u64, RepositoryError>> + Send;
}

/// [`Store`] backed by the shared `PostgreSQL` pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    const fn customers(&self) -> CustomerRepository<'_> {
        CustomerRepository::new(&self.pool)
    }
}

impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn check_login(&self, credentials: &LoginCredentials) -> Result<bool, RepositoryError> {
        WorkerRepository::new(&self.pool)
            .check_login(credentials)
            .await
    }

    async fn search_customers(&self, term: &str) -> Result<Vec<Customer>, RepositoryError> {
        self.customers().search(term).await
    }

    async fn get_customer(&self, row: CustomerRowId) -> Result<Option<Customer>, RepositoryError> {
        self.customers().get_by_row(row).await
    }

    async fn insert_customer(&self, fields: &CustomerFields) -> Result<Customer, RepositoryError> {
        self.customers().create(fields).await
    }

    async fn update_customer(
        &self,
        row: CustomerRowId,
        fields: &CustomerFields,
    ) -> Result<Option<Customer>, RepositoryError> {
        self.customers().replace(row, fields).await
    }

    async fn customer_business_id(
        &self,
        row: CustomerRowId,
    ) -> Result<Option<String>, RepositoryError> {
        self.customers().business_id(row).await
    }

    async fn count_linked_users(&self, row: CustomerRowId) -> Result<i64, RepositoryError> {
        self.customers().count_linked_users(row).await
    }

    async fn count_linked_orders(&self, customer_id: &str) -> Result<i64, RepositoryError> {
        self.customers().count_linked_orders(customer_id).await
    }

    async fn delete_customer(&self, row: CustomerRowId) -> Result<u64, RepositoryError> {
        self.customers().delete(row).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_field_from_constraint() {
        assert_eq!(
            ConflictField::from_constraint(Some("customer_e_mail_key")),
            ConflictField::Email
        );
        assert_eq!(
            ConflictField::from_constraint(Some("customer_id_key")),
            ConflictField::Id
        );
        assert_eq!(
            ConflictField::from_constraint(Some("customer_pkey")),
            ConflictField::Unknown
        );
        assert_eq!(ConflictField::from_constraint(None), ConflictField::Unknown);
    }

    #[test]
    fn test_conflict_messages_name_the_field() {
        assert!(ConflictField::Email.message().contains("email"));
        assert!(ConflictField::Id.message().contains("ID"));
    }

    #[test]
    fn test_classify_leaves_other_errors_opaque() {
        let err = classify(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, RepositoryError::Database(_)));
    }

    #[test]
    fn test_connect_options_from_parts() {
        use crate::config::DatabaseParts;
        use secrecy::SecretString;

        let target = DatabaseTarget::Parts(DatabaseParts {
            server: "db.internal".to_string(),
            port: 6543,
            user: "desk".to_string(),
            password: SecretString::from("pw"),
            database: "customers".to_string(),
            encrypt: false,
        });

        let options = connect_options(&target).expect("parts always build options");
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("customers"));
    }
}
