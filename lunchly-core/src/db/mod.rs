//! PostgreSQL store - connection pool, schema bootstrap, queries
//!
//! # Design Principles
//!
//! - Every value is bound through a `$n` placeholder, never formatted into SQL
//! - One statement per operation, no multi-step transactions
//! - Driver errors are returned as-is inside `StoreError::Database`

pub mod customers;
pub mod pool;
pub mod reservations;
pub mod schema;

use sqlx::PgPool;

pub use pool::create_pool_with_options;
pub use schema::create_tables;

/// Customer and reservation store backed by a `PgPool`.
///
/// Cloning is cheap; clones share the pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
