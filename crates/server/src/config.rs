//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Database (one form required)
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - or `DB_SERVER`, `DB_USER`, `DB_PASSWORD`, `DB_DATABASE` - connection parts
//!
//! ## Optional
//! - `DB_PORT` - Database port when using parts (default: 5432)
//! - `DB_ENCRYPT` - Require TLS to the database (default: true)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 3000)
//! - `STATIC_DIR` - Directory holding the front-end (default: crates/server/static)
//! - `APP_NAME` - Name shown in the web app manifest (default: Customer Desk)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `LOG_FORMAT` - `json` for JSON log lines (read in `main`)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory served as the static front-end
    pub static_dir: PathBuf,
    /// Application name used in the web app manifest
    pub app_name: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Where and how to connect
    pub target: DatabaseTarget,
    /// Maximum number of pooled connections
    pub max_connections: u32,
}

/// The two ways a database can be addressed.
///
/// `SecretString` redacts itself in `Debug` output, so deriving is safe.
#[derive(Debug, Clone)]
pub enum DatabaseTarget {
    /// A full connection string (contains the password).
    Url(SecretString),
    /// Individual connection parts.
    Parts(DatabaseParts),
}

/// Individual database connection parameters.
#[derive(Debug, Clone)]
pub struct DatabaseParts {
    pub server: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub database: String,
    /// Require an encrypted connection.
    pub encrypt: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database = DatabaseConfig::from_env()?;
        let host = parse_env("HOST", "0.0.0.0")?;
        let port = parse_env("PORT", "3000")?;
        let static_dir = PathBuf::from(get_env_or_default("STATIC_DIR", "crates/server/static"));
        let app_name = get_env_or_default("APP_NAME", "Customer Desk");

        Ok(Self {
            database,
            host,
            port,
            static_dir,
            app_name,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl DatabaseConfig {
    /// Load only the database settings (used by the CLI).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if neither `DATABASE_URL` nor the full set of
    /// `DB_*` parts is present, or a value does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let target = match get_optional_env("DATABASE_URL") {
            Some(url) => DatabaseTarget::Url(SecretString::from(url)),
            None => DatabaseTarget::Parts(DatabaseParts::from_env()?),
        };

        Ok(Self {
            target,
            max_connections: parse_env("DB_MAX_CONNECTIONS", "10")?,
        })
    }
}

impl DatabaseParts {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: get_required_env("DB_SERVER")?,
            port: parse_env("DB_PORT", "5432")?,
            user: get_required_env("DB_USER")?,
            password: SecretString::from(get_required_env("DB_PASSWORD")?),
            database: get_required_env("DB_DATABASE")?,
            encrypt: parse_bool("DB_ENCRYPT", &get_env_or_default("DB_ENCRYPT", "true"))?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a boolean flag, accepting the usual spellings.
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
