//! Seed demo customers.
//!
//! Reads a YAML list (or uses a small built-in one), validates every entry
//! with the API's rule before connecting, then inserts with
//! `ON CONFLICT DO NOTHING` so re-running is harmless.
//!
//! ```yaml
//! - id: C1
//!   name: Acme
//!   email: hello@acme.example
//!   companyName: Acme Ltd
//! ```

use std::path::Path;

use customer_desk_core::{CustomerFields, CustomerInput};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Entry `index` (zero-based) is missing its id or name.
    #[error("Entry {index}: {message}")]
    Invalid { index: usize, message: String },

    #[error("Database connection error: {0}")]
    Connect(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

const DEMO_CUSTOMERS: &str = r"
- id: C1
  name: Acme
  phone: '+1 555 0100'
  email: hello@acme.example
  companyName: Acme Ltd
- id: C2
  name: Globex
  email: sales@globex.example
  companyName: Globex Corporation
- id: C3
  name: Initech
  phone: '+1 555 0199'
";

/// Parse and validate a YAML customer list.
fn parse(yaml: &str) -> Result<Vec<CustomerFields>, SeedError> {
    let entries: Vec<CustomerInput> = serde_yaml::from_str(yaml)?;
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            entry.validate().map_err(|e| SeedError::Invalid {
                index,
                message: e.to_string(),
            })
        })
        .collect()
}

/// Insert demo customers.
///
/// # Returns
///
/// The number of customers actually inserted (existing ones are skipped).
///
/// # Errors
///
/// Returns `SeedError` if the file cannot be read or validated, or the
/// database is unreachable.
pub async fn customers(file: Option<&Path>) -> Result<u64, SeedError> {
    let yaml = match file {
        Some(path) => {
            info!(path = %path.display(), "Loading customers from file");
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| SeedError::Read {
                    path: path.display().to_string(),
                    source,
                })?
        }
        None => DEMO_CUSTOMERS.to_owned(),
    };

    let customers = parse(&yaml)?;
    info!(count = customers.len(), "Parsed customers");

    let pool = super::connect()
        .await
        .map_err(|e| SeedError::Connect(e.to_string()))?;

    let mut inserted = 0;
    for customer in &customers {
        let result = sqlx::query(
            "INSERT INTO customer (id, name, phone, e_mail, company_name) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT DO NOTHING",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.company_name)
        .execute(&pool)
        .await?;

        if result.rows_affected() == 0 {
            info!(customer_id = %customer.id, "Already present, skipped");
        }
        inserted += result.rows_affected();
    }

    Ok(inserted)
}
