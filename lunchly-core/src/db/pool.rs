//! Connection pool for [`PgStore`]
//!
//! One pool per process, sized from `[database] max_connections`.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use super::PgStore;
use crate::config::DatabaseConfig;
use crate::error::Result;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Create a PostgreSQL connection pool.
///
/// # Arguments
///
/// * `database_url` - PostgreSQL connection string
/// * `max_connections` - Maximum number of connections in the pool
///
/// # Errors
///
/// Returns the driver error if the first connection cannot be opened.
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> std::result::Result<PgPool, sqlx::Error> {
    info!(max_connections, "connecting to database");
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

impl PgStore {
    /// Open a pool from the `[database]` config section.
    ///
    /// ```ignore
    /// let config = LunchlyConfig::load()?;
    /// let store = PgStore::connect(&config.database).await?;
    /// ```
    pub async fn connect(database: &DatabaseConfig) -> Result<Self> {
        let pool = create_pool_with_options(&database.url, database.max_connections).await?;
        Ok(Self::new(pool))
    }
}
