//! Customer records
//!
//! Unsaved and saved customers are distinct types: a [`NewCustomer`] has no
//! identifier, a [`PersistedCustomer`] always has one and cannot change it.
//! [`Customer`] wraps either, for callers that hold one value across a save.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Reservation;
use crate::store::ReservationStore;

/// Storage-assigned customer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(i32);

impl CustomerId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for CustomerId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The four mutable columns of a customer row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerFields {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl CustomerFields {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: None,
            notes: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// "first last", joined by exactly one space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A customer that has not been written to storage yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub fields: CustomerFields,
}

impl NewCustomer {
    pub fn new(fields: CustomerFields) -> Self {
        Self { fields }
    }

    pub fn full_name(&self) -> String {
        self.fields.full_name()
    }
}

impl From<CustomerFields> for NewCustomer {
    fn from(fields: CustomerFields) -> Self {
        Self::new(fields)
    }
}

/// A customer loaded from (or just written to) storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistedCustomer {
    id: CustomerId,
    #[serde(flatten)]
    pub fields: CustomerFields,
}

impl PersistedCustomer {
    /// Only stores construct these: the id must come from storage.
    pub(crate) fn new(id: CustomerId, fields: CustomerFields) -> Self {
        Self { id, fields }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn full_name(&self) -> String {
        self.fields.full_name()
    }

    /// Load this customer's reservations. Not cached: every call queries.
    pub async fn reservations<S>(&self, store: &S) -> Result<Vec<Reservation>>
    where
        S: ReservationStore + ?Sized,
    {
        store.for_customer(self.id).await
    }
}

/// Either side of the save boundary.
///
/// [`crate::CustomerStore::save`] turns `New` into `Persisted` in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Customer {
    New(NewCustomer),
    Persisted(PersistedCustomer),
}

impl Customer {
    pub fn id(&self) -> Option<CustomerId> {
        match self {
            Self::New(_) => None,
            Self::Persisted(customer) => Some(customer.id()),
        }
    }

    pub fn fields(&self) -> &CustomerFields {
        match self {
            Self::New(customer) => &customer.fields,
            Self::Persisted(customer) => &customer.fields,
        }
    }

    pub fn fields_mut(&mut self) -> &mut CustomerFields {
        match self {
            Self::New(customer) => &mut customer.fields,
            Self::Persisted(customer) => &mut customer.fields,
        }
    }

    pub fn full_name(&self) -> String {
        self.fields().full_name()
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted(_))
    }
}

impl From<NewCustomer> for Customer {
    fn from(customer: NewCustomer) -> Self {
        Self::New(customer)
    }
}

impl From<PersistedCustomer> for Customer {
    fn from(customer: PersistedCustomer) -> Self {
        Self::Persisted(customer)
    }
}

/// Leaderboard entry: the count is computed at retrieval, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCustomer {
    #[serde(flatten)]
    pub customer: PersistedCustomer,
    pub reservation_count: i64,
}
