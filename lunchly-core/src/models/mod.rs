//! Plain data records
//!
//! No I/O happens here. Records are moved in and out of the stores in
//! [`crate::store`]; they never hold a connection or cache related rows.

pub mod customer;
pub mod reservation;

pub use customer::{Customer, CustomerFields, CustomerId, NewCustomer, PersistedCustomer, RankedCustomer};
pub use reservation::{NewReservation, Reservation, ReservationId};
