//! In-process store mirroring the queries of [`crate::PgStore`]
//!
//! Used as the substitute backend in tests. Matching follows PostgreSQL
//! `ILIKE`: `%` matches any run of characters, `_` exactly one, `\` escapes
//! the next character, and characters compare case-insensitively one for
//! one. Name ordering compares strings by code point, which agrees with a
//! database collation for ASCII names only.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::models::{
    CustomerFields, CustomerId, NewCustomer, NewReservation, PersistedCustomer, RankedCustomer,
    Reservation, ReservationId,
};
use crate::store::{prefix_pattern, CustomerStore, ReservationStore, TOP_CUSTOMERS_LIMIT};

#[derive(Debug, Default)]
struct Tables {
    customers: BTreeMap<i32, CustomerFields>,
    reservations: BTreeMap<i32, Reservation>,
    // SERIAL sequences
    customer_seq: i32,
    reservation_seq: i32,
}

impl Tables {
    fn persisted(&self) -> impl Iterator<Item = PersistedCustomer> + '_ {
        self.customers
            .iter()
            .map(|(id, fields)| PersistedCustomer::new(CustomerId::new(*id), fields.clone()))
    }
}

/// Customer and reservation tables held in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// ORDER BY last_name, first_name. Stable, so equal names stay in id order.
fn sort_by_name(customers: &mut [PersistedCustomer]) {
    customers.sort_by(|a, b| {
        (&a.fields.last_name, &a.fields.first_name)
            .cmp(&(&b.fields.last_name, &b.fields.first_name))
    });
}

/// Case-insensitive LIKE match of `text` against `pattern`.
pub(crate) fn ilike(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    like_match(&text, &compile(pattern))
}

/// Case folding that keeps one text char against one pattern char, so `_`
/// never consumes half of a multi-char lowercase expansion.
fn same_letter(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase()) || a.to_uppercase().eq(b.to_uppercase())
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Literal(char),
    AnyOne,
    AnyRun,
}

fn compile(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        let token = match c {
            '%' => Token::AnyRun,
            '_' => Token::AnyOne,
            // trailing backslash matches itself
            '\\' => Token::Literal(chars.next().unwrap_or('\\')),
            other => Token::Literal(other),
        };
        tokens.push(token);
    }
    tokens
}

// Greedy matcher with backtracking to the last `%`.
fn like_match(text: &[char], pattern: &[Token]) -> bool {
    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some(Token::AnyRun) => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(Token::AnyOne) => {
                t += 1;
                p += 1;
            }
            Some(Token::Literal(c)) if same_letter(*c, text[t]) => {
                t += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((star_p, star_t)) => {
                    p = star_p + 1;
                    t = star_t + 1;
                    backtrack = Some((star_p, star_t + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|token| *token == Token::AnyRun)
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<PersistedCustomer>> {
        let tables = self.tables.read().await;
        let mut customers: Vec<_> = tables.persisted().collect();
        sort_by_name(&mut customers);
        Ok(customers)
    }

    async fn search(&self, term: &str) -> Result<Vec<PersistedCustomer>> {
        debug!(term, "searching customers");
        let pattern = prefix_pattern(term);
        let tables = self.tables.read().await;
        let mut customers: Vec<_> = tables
            .persisted()
            .filter(|c| {
                ilike(&c.full_name(), &pattern)
                    || ilike(&c.fields.first_name, &pattern)
                    || ilike(&c.fields.last_name, &pattern)
            })
            .collect();
        sort_by_name(&mut customers);
        Ok(customers)
    }

    async fn get(&self, id: CustomerId) -> Result<PersistedCustomer> {
        let tables = self.tables.read().await;
        tables
            .customers
            .get(&id.get())
            .map(|fields| PersistedCustomer::new(id, fields.clone()))
            .ok_or_else(|| StoreError::customer_not_found(id.get()))
    }

    async fn top_ten(&self) -> Result<Vec<RankedCustomer>> {
        let tables = self.tables.read().await;

        let mut counts: HashMap<CustomerId, i64> = HashMap::new();
        for reservation in tables.reservations.values() {
            *counts.entry(reservation.customer_id).or_default() += 1;
        }

        // inner join: customers without reservations never appear
        let mut ranked: Vec<RankedCustomer> = tables
            .persisted()
            .filter_map(|customer| {
                counts.get(&customer.id()).map(|count| RankedCustomer {
                    customer,
                    reservation_count: *count,
                })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.reservation_count
                .cmp(&a.reservation_count)
                .then_with(|| a.customer.fields.last_name.cmp(&b.customer.fields.last_name))
                .then_with(|| a.customer.fields.first_name.cmp(&b.customer.fields.first_name))
        });
        ranked.truncate(TOP_CUSTOMERS_LIMIT);
        Ok(ranked)
    }

    async fn insert(&self, customer: &NewCustomer) -> Result<PersistedCustomer> {
        let mut tables = self.tables.write().await;
        tables.customer_seq += 1;
        let id = tables.customer_seq;
        tables.customers.insert(id, customer.fields.clone());
        debug!(customer_id = id, "inserted customer");
        Ok(PersistedCustomer::new(CustomerId::new(id), customer.fields.clone()))
    }

    async fn update(&self, customer: &PersistedCustomer) -> Result<()> {
        let mut tables = self.tables.write().await;
        // UPDATE ... WHERE id = $n touches zero rows for an unknown id
        if let Some(row) = tables.customers.get_mut(&customer.id().get()) {
            *row = customer.fields.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn for_customer(&self, customer_id: CustomerId) -> Result<Vec<Reservation>> {
        let tables = self.tables.read().await;
        let mut reservations: Vec<_> = tables
            .reservations
            .values()
            .filter(|r| r.customer_id == customer_id)
            .cloned()
            .collect();
        reservations.sort_by_key(|r| (r.start_at, r.id()));
        Ok(reservations)
    }

    async fn get(&self, id: ReservationId) -> Result<Reservation> {
        let tables = self.tables.read().await;
        tables
            .reservations
            .get(&id.get())
            .cloned()
            .ok_or_else(|| StoreError::reservation_not_found(id.get()))
    }

    async fn insert(&self, reservation: &NewReservation) -> Result<Reservation> {
        let mut tables = self.tables.write().await;
        let customer_id = reservation.customer_id;
        if !tables.customers.contains_key(&customer_id.get()) {
            return Err(StoreError::customer_not_found(customer_id.get()));
        }
        tables.reservation_seq += 1;
        let id = ReservationId::new(tables.reservation_seq);
        let row = Reservation::from_new(id, reservation.clone());
        tables.reservations.insert(id.get(), row.clone());
        Ok(row)
    }

    async fn update(&self, reservation: &Reservation) -> Result<()> {
        let mut tables = self.tables.write().await;
        let customer_id = reservation.customer_id;
        if !tables.customers.contains_key(&customer_id.get()) {
            return Err(StoreError::customer_not_found(customer_id.get()));
        }
        if let Some(row) = tables.reservations.get_mut(&reservation.id().get()) {
            *row = reservation.clone();
        }
        Ok(())
    }
}
