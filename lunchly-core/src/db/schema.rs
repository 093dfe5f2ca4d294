//! Table bootstrap for an empty database
//!
//! Idempotent `CREATE ... IF NOT EXISTS` statements. There is no version
//! table: changing a column means editing the database by hand.

use sqlx::PgPool;
use tracing::info;

use crate::error::Result;

/// Create the `customers` and `reservations` tables if they are missing.
pub async fn create_tables(pool: &PgPool) -> Result<()> {
    info!("Creating Lunchly tables if missing...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            id SERIAL PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            phone TEXT,
            notes TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reservations (
            id SERIAL PRIMARY KEY,
            customer_id INTEGER NOT NULL REFERENCES customers(id),
            start_at TIMESTAMP NOT NULL,
            num_guests INTEGER NOT NULL,
            notes TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS reservations_customer_id_idx
            ON reservations (customer_id)
        "#,
    )
    .execute(pool)
    .await?;

    info!("Lunchly tables ready");
    Ok(())
}
