//! lunchly CLI - customer and reservation records for the Lunchly restaurant
//!
//! Thin front end over `lunchly-core`:
//! - Customer listing, search, leaderboard, add/edit (`customers` subcommand)
//! - Booking and editing reservations (`reservations` subcommand)
//! - Creating the tables in an empty database (`db` subcommand)

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lunchly_core::{LunchlyConfig, PgStore, StoreError};
use tracing::{debug, error};

mod commands;
mod tracing_setup;

use tracing_setup::{apply_configured_level, init_tracing, TracingConfig};

/// Exit status when a requested record does not exist
const EXIT_NOT_FOUND: u8 = 4;

#[derive(Parser, Debug)]
#[command(
    name = "lunchly",
    author,
    version,
    about = "Manage Lunchly customers and reservations",
    long_about = "List, search and rank restaurant customers, and record their reservations. \
                  Connects to PostgreSQL using DATABASE_URL or ~/.lunchly/config.toml."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// PostgreSQL connection string (overrides DATABASE_URL and config file)
    #[arg(long, global = true, value_name = "URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Customer records (list, search, show, top, add, edit)
    Customers(commands::customers::CustomersArgs),
    /// Reservation records (add, edit)
    Reservations(commands::reservations::ReservationsArgs),
    /// Database maintenance (init)
    Db(commands::db::DbArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if is_not_found(&err) => {
            eprintln!("{:#}", err);
            ExitCode::from(EXIT_NOT_FOUND)
        }
        Err(err) => {
            error!("{:#}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Subscriber first so config loading is logged; the configured level
    // replaces the default filter once the file has been read.
    let mut tracing_config = TracingConfig {
        debug: cli.debug,
        ..TracingConfig::default()
    };
    let filter = init_tracing(&tracing_config).ok();

    let mut config = LunchlyConfig::load().context("failed to load configuration")?;
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }

    tracing_config.default_level = config.logging.level.clone();
    if let Some(filter) = &filter {
        apply_configured_level(filter, &tracing_config)?;
    }

    let mut stdout = std::io::stdout();

    match cli.command {
        Commands::Customers(args) => {
            let store = connect(&config).await?;
            commands::run_customers(args, &store, &mut stdout).await
        }
        Commands::Reservations(args) => {
            let store = connect(&config).await?;
            commands::run_reservations(args, &store, &mut stdout).await
        }
        Commands::Db(args) => {
            let store = connect(&config).await?;
            commands::run_db(args, store.pool(), &mut stdout).await
        }
    }
}

async fn connect(config: &LunchlyConfig) -> Result<PgStore> {
    debug!(max_connections = config.database.max_connections, "opening connection pool");
    PgStore::connect(&config.database)
        .await
        .context("failed to connect to database")
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<StoreError>()
            .is_some_and(StoreError::is_not_found)
    })
}
