//! Command implementations for lunchly CLI
//!
//! Commands take the store and an output writer so they run the same against
//! PostgreSQL and the in-memory store used in tests.

pub mod customers;
pub mod db;
pub mod reservations;

// Re-export main dispatcher functions for flat access from main.rs
pub use customers::run_customers;
pub use db::run_db;
pub use reservations::run_reservations;

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

/// Write `value` as pretty JSON followed by a newline
pub(crate) fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Empty strings clear an optional field
pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
