//! Database command - schema bootstrap

use std::io::Write;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lunchly_core::db::create_tables;
use sqlx::PgPool;

#[derive(Parser, Debug)]
#[command(about = "Database maintenance")]
pub struct DbArgs {
    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// Create the customers and reservations tables if they do not exist
    Init,
}

pub async fn run_db<W: Write>(args: DbArgs, pool: &PgPool, out: &mut W) -> Result<()> {
    match args.command {
        DbCommand::Init => {
            create_tables(pool)
                .await
                .context("failed to create tables")?;
            writeln!(out, "Tables ready")?;
            Ok(())
        }
    }
}
