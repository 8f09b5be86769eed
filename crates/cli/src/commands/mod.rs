//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod worker;

use customer_desk_server::config::DatabaseConfig;
use customer_desk_server::db;
use sqlx::PgPool;

/// Connect with the server's database settings.
pub async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    let config = DatabaseConfig::from_env()?;
    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config).await?;
    Ok(pool)
}
