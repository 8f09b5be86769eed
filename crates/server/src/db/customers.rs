//! Customer repository for database operations.
//!
//! Runtime queries with bind parameters throughout. The `row` column is
//! always quoted since `ROW` is an SQL keyword.

use sqlx::PgPool;
use tracing::instrument;

use customer_desk_core::{Customer, CustomerFields, CustomerRowId};

use super::{RepositoryError, classify};

/// Calls the customer search procedure with one text parameter.
const SEARCH_SQL: &str = r#"
    SELECT "row", id, name, phone, e_mail, company_name
    FROM sp_search_customer_for_mangment($1)
"#;

/// Database row shape of the `customer` table.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    row: CustomerRowId,
    id: String,
    name: String,
    phone: Option<String>,
    e_mail: Option<String>,
    company_name: Option<String>,
}

impl From<CustomerRow> for Customer {
    fn from(r: CustomerRow) -> Self {
        Self {
            row: r.row,
            id: r.id,
            name: r.name,
            phone: r.phone,
            email: r.e_mail,
            company_name: r.company_name,
        }
    }
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Run the search procedure and return every row it yields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the procedure call fails.
    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(SEARCH_SQL)
            .bind(term)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    /// Get a customer by row key.
    ///
    /// Should the key ever match more than one row, the first is returned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get_by_row(&self, row: CustomerRowId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT "row", id, name, phone, e_mail, company_name
            FROM customer
            WHERE "row" = $1
            "#,
        )
        .bind(row)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    /// Insert a new customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the id or email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, fields), fields(customer_id = %fields.id))]
    pub async fn create(&self, fields: &CustomerFields) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            INSERT INTO customer (id, name, phone, e_mail, company_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING "row", id, name, phone, e_mail, company_name
            "#,
        )
        .bind(&fields.id)
        .bind(&fields.name)
        .bind(&fields.phone)
        .bind(&fields.email)
        .bind(&fields.company_name)
        .fetch_one(self.pool)
        .await
        .map_err(classify)?;

        Ok(row.into())
    }

    /// Overwrite every editable column of a customer.
    ///
    /// Absent optional fields are written as `NULL`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the new id or email collides.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, fields), fields(customer_id = %fields.id))]
    pub async fn replace(
        &self,
        row: CustomerRowId,
        fields: &CustomerFields,
    ) -> Result<Option<Customer>, RepositoryError> {
        let updated = sqlx::query_as::<_, CustomerRow>(
            r#"
            UPDATE customer
            SET id = $1, name = $2, e_mail = $3, phone = $4, company_name = $5
            WHERE "row" = $6
            RETURNING "row", id, name, phone, e_mail, company_name
            "#,
        )
        .bind(&fields.id)
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(&fields.company_name)
        .bind(row)
        .fetch_optional(self.pool)
        .await
        .map_err(classify)?;

        Ok(updated.map(Customer::from))
    }

    /// Resolve a row key to the business `id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn business_id(&self, row: CustomerRowId) -> Result<Option<String>, RepositoryError> {
        let id = sqlx::query_scalar::<_, String>(r#"SELECT id FROM customer WHERE "row" = $1"#)
            .bind(row)
            .fetch_optional(self.pool)
            .await?;

        Ok(id)
    }

    /// Count users linked to a customer row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn count_linked_users(&self, row: CustomerRowId) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM customer_user WHERE customer_row = $1",
        )
        .bind(row)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Count orders recorded under a business `id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn count_linked_orders(&self, customer_id: &str) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM order_recored WHERE customer_id = $1",
        )
        .bind(customer_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Delete a customer row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Referenced` if other rows still point at it.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self))]
    pub async fn delete(&self, row: CustomerRowId) -> Result<u64, RepositoryError> {
        let result = sqlx::query(r#"DELETE FROM customer WHERE "row" = $1"#)
            .bind(row)
            .execute(self.pool)
            .await
            .map_err(classify)?;

        Ok(result.rows_affected())
    }
}
