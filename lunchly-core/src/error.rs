//! Error type for store operations.
//!
//! A lookup by identifier that finds no row is the only domain failure.
//! Everything else is the driver's error, passed through untouched so the
//! caller sees exactly what PostgreSQL reported.

use thiserror::Error;

/// Store operation error
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row with the requested identifier
    #[error("No such {resource}: {id}")]
    NotFound { resource: &'static str, id: i32 },

    /// Connectivity loss, constraint violation, malformed query
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Create a not-found error for a customer id
    pub fn customer_not_found(id: i32) -> Self {
        Self::NotFound {
            resource: "customer",
            id,
        }
    }

    /// Create a not-found error for a reservation id
    pub fn reservation_not_found(id: i32) -> Self {
        Self::NotFound {
            resource: "reservation",
            id,
        }
    }

    /// HTTP-equivalent status for an upstream layer to translate.
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Database(_) => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
