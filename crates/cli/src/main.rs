//! Customer Desk CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! desk-cli migrate
//!
//! # Create a worker login
//! desk-cli worker create -u amal -p 's3cret'
//!
//! # Seed demo customers (built-in list or a YAML file)
//! desk-cli seed customers
//! desk-cli seed customers --file seeds/customers.yaml
//! ```
//!
//! Database settings are read the same way the server reads them
//! (`DATABASE_URL`, or `DB_SERVER`/`DB_USER`/`DB_PASSWORD`/`DB_DATABASE`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

#[derive(Parser)]
#[command(name = "desk-cli")]
#[command(author, version, about = "Customer Desk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage worker (staff) logins
    Worker {
        #[command(subcommand)]
        action: WorkerAction,
    },
    /// Insert demo data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum WorkerAction {
    /// Create a new worker login
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Plain-text password, hashed by the database
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert demo customers, skipping any that already exist
    Customers {
        /// YAML list of customers; the built-in list is used when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Worker { action } => match action {
            WorkerAction::Create { username, password } => {
                let row =
                    commands::worker::create(&username, &SecretString::from(password)).await?;
                tracing::info!(worker_row = row, %username, "Worker created");
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Customers { file } => {
                let inserted = commands::seed::customers(file.as_deref()).await?;
                tracing::info!(inserted, "Seeding complete");
            }
        },
    }
    Ok(())
}
