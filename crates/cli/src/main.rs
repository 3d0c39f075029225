//! Athletica CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply schema and session-store migrations
//! athletica-cli migrate
//!
//! # Give an existing account access to /admin
//! athletica-cli admin grant --email coach@athletica.test
//!
//! # Take it away again
//! athletica-cli admin revoke --email coach@athletica.test
//!
//! # Load products from a YAML file
//! athletica-cli seed products --file seed/products.yaml
//! ```
//!
//! All commands read `ATHLETICA_DATABASE_URL` (or `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "athletica-cli")]
#[command(author, version, about = "Athletica CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin access
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Mark an account as admin
    Grant {
        /// Email of a registered account
        #[arg(short, long)]
        email: String,
    },
    /// Remove an account's admin marker
    Revoke {
        #[arg(short, long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert products from a YAML list
    Products {
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Grant { email } => commands::admin::grant(&email).await?,
            AdminAction::Revoke { email } => commands::admin::revoke(&email).await?,
        },
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => commands::seed::products(&file).await?,
        },
    }
    Ok(())
}
