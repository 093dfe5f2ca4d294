//! lunchly-core: customer and reservation data access
//!
//! Plain records live in [`models`], storage operations behind the
//! [`CustomerStore`] and [`ReservationStore`] traits. Two implementations
//! are provided:
//! - [`PgStore`] over a PostgreSQL pool (parametrized `$n` queries only)
//! - [`MemoryStore`] reproducing the same query semantics in process

pub mod config;
pub mod db;
pub mod error;
pub mod memory;
pub mod models;
pub mod store;

pub use config::LunchlyConfig;
pub use db::PgStore;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use models::{
    Customer, CustomerFields, CustomerId, NewCustomer, NewReservation, PersistedCustomer,
    RankedCustomer, Reservation, ReservationId,
};
pub use store::{CustomerStore, ReservationStore};
