//! Store traits
//!
//! Every method is one round trip to the backing store. Nothing is cached
//! between calls.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Customer, CustomerId, NewCustomer, NewReservation, PersistedCustomer, RankedCustomer,
    Reservation, ReservationId,
};

/// Maximum number of rows returned by [`CustomerStore::top_ten`]
pub const TOP_CUSTOMERS_LIMIT: usize = 10;

/// LIKE pattern for a prefix search.
///
/// The term is not escaped: `%`, `_` and `\` keep their LIKE meaning.
pub fn prefix_pattern(term: &str) -> String {
    format!("{}%", term)
}

/// Customer table access
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// All customers, ordered by last name then first name.
    async fn list_all(&self) -> Result<Vec<PersistedCustomer>>;

    /// Customers whose full, first or last name starts with `term`
    /// (case-insensitive). Ordered like [`CustomerStore::list_all`].
    async fn search(&self, term: &str) -> Result<Vec<PersistedCustomer>>;

    /// Fails with `NotFound` when no row has this id.
    async fn get(&self, id: CustomerId) -> Result<PersistedCustomer>;

    /// Up to ten customers with the most reservations. Customers without
    /// reservations are not ranked. Ties break on last name, first name.
    async fn top_ten(&self) -> Result<Vec<RankedCustomer>>;

    /// Insert a row and return it with its generated id.
    async fn insert(&self, customer: &NewCustomer) -> Result<PersistedCustomer>;

    /// Overwrite all mutable fields of the row with this customer's id.
    async fn update(&self, customer: &PersistedCustomer) -> Result<()>;

    /// Insert or update depending on the variant.
    ///
    /// A `Customer::New` becomes `Customer::Persisted` in place, carrying
    /// the id storage assigned.
    async fn save(&self, customer: &mut Customer) -> Result<CustomerId> {
        match customer {
            Customer::New(new) => {
                let persisted = self.insert(new).await?;
                let id = persisted.id();
                *customer = Customer::Persisted(persisted);
                Ok(id)
            }
            Customer::Persisted(existing) => {
                self.update(existing).await?;
                Ok(existing.id())
            }
        }
    }
}

/// Reservation table access
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Reservations for one customer, earliest first. Unknown ids yield an
    /// empty list.
    async fn for_customer(&self, customer_id: CustomerId) -> Result<Vec<Reservation>>;

    /// Fails with `NotFound` when no row has this id.
    async fn get(&self, id: ReservationId) -> Result<Reservation>;

    async fn insert(&self, reservation: &NewReservation) -> Result<Reservation>;

    async fn update(&self, reservation: &Reservation) -> Result<()>;
}
