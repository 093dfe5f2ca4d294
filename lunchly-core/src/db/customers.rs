//! Customer queries
//!
//! - list/search: ORDER BY last_name, first_name
//! - search: ILIKE against full, first and last name with one bound pattern
//! - top_ten: inner JOIN on reservations with GROUP BY, so unbooked
//!   customers never rank

use async_trait::async_trait;
use sqlx::FromRow;
use tracing::{debug, warn};

use super::PgStore;
use crate::error::{Result, StoreError};
use crate::models::{CustomerFields, CustomerId, NewCustomer, PersistedCustomer, RankedCustomer};
use crate::store::{prefix_pattern, CustomerStore, TOP_CUSTOMERS_LIMIT};

/// Customer record from database
#[derive(Debug, FromRow)]
struct CustomerRow {
    id: i32,
    first_name: String,
    last_name: String,
    phone: Option<String>,
    notes: Option<String>,
}

impl From<CustomerRow> for PersistedCustomer {
    fn from(r: CustomerRow) -> Self {
        PersistedCustomer::new(
            CustomerId::new(r.id),
            CustomerFields {
                first_name: r.first_name,
                last_name: r.last_name,
                phone: r.phone,
                notes: r.notes,
            },
        )
    }
}

/// Customer with reservation count for the leaderboard
#[derive(Debug, FromRow)]
struct RankedRow {
    #[sqlx(flatten)]
    customer: CustomerRow,
    reservation_count: i64,
}

impl From<RankedRow> for RankedCustomer {
    fn from(r: RankedRow) -> Self {
        RankedCustomer {
            customer: r.customer.into(),
            reservation_count: r.reservation_count,
        }
    }
}

#[async_trait]
impl CustomerStore for PgStore {
    async fn list_all(&self) -> Result<Vec<PersistedCustomer>> {
        let rows: Vec<CustomerRow> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, phone, notes
            FROM customers
            ORDER BY last_name, first_name
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        debug!(count = rows.len(), "listed customers");
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn search(&self, term: &str) -> Result<Vec<PersistedCustomer>> {
        let rows: Vec<CustomerRow> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, phone, notes
            FROM customers
            WHERE CONCAT(first_name, ' ', last_name) ILIKE $1
               OR first_name ILIKE $1
               OR last_name ILIKE $1
            ORDER BY last_name, first_name
            "#,
        )
        .bind(prefix_pattern(term))
        .fetch_all(self.pool())
        .await?;

        debug!(term, count = rows.len(), "searched customers");
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: CustomerId) -> Result<PersistedCustomer> {
        let row: CustomerRow = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, phone, notes
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| StoreError::customer_not_found(id.get()))?;

        Ok(row.into())
    }

    async fn top_ten(&self) -> Result<Vec<RankedCustomer>> {
        let rows: Vec<RankedRow> = sqlx::query_as(
            r#"
            SELECT
                c.id,
                c.first_name,
                c.last_name,
                c.phone,
                c.notes,
                COUNT(r.id) AS reservation_count
            FROM customers c
            JOIN reservations r ON r.customer_id = c.id
            GROUP BY c.id
            ORDER BY reservation_count DESC, c.last_name, c.first_name
            LIMIT $1
            "#,
        )
        .bind(TOP_CUSTOMERS_LIMIT as i64)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, customer: &NewCustomer) -> Result<PersistedCustomer> {
        let fields = &customer.fields;
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO customers (first_name, last_name, phone, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(fields.phone.as_deref())
        .bind(fields.notes.as_deref())
        .fetch_one(self.pool())
        .await?;

        debug!(customer_id = id, "inserted customer");
        Ok(PersistedCustomer::new(CustomerId::new(id), fields.clone()))
    }

    async fn update(&self, customer: &PersistedCustomer) -> Result<()> {
        let fields = &customer.fields;
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET first_name = $1,
                last_name = $2,
                phone = $3,
                notes = $4
            WHERE id = $5
            "#,
        )
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(fields.phone.as_deref())
        .bind(fields.notes.as_deref())
        .bind(customer.id().get())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            warn!(customer_id = %customer.id(), "update matched no customer row");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_tables;
    use crate::models::{Customer, NewReservation};
    use crate::store::ReservationStore;
    use chrono::NaiveDate;
    use sqlx::PgPool;

    // Integration tests - run with DATABASE_URL set
    // cargo test -p lunchly-core -- --ignored

    async fn store(pool: PgPool) -> PgStore {
        create_tables(&pool).await.expect("schema bootstrap failed");
        PgStore::new(pool)
    }

    async fn add(store: &PgStore, first: &str, last: &str) -> PersistedCustomer {
        CustomerStore::insert(store, &NewCustomer::new(CustomerFields::new(first, last)))
            .await
            .expect("insert failed")
    }

    async fn book(store: &PgStore, customer: &PersistedCustomer, times: u32) {
        for day in 1..=times {
            let start_at = NaiveDate::from_ymd_opt(2024, 5, day)
                .unwrap()
                .and_hms_opt(18, 30, 0)
                .unwrap();
            ReservationStore::insert(
                store,
                &NewReservation {
                    customer_id: customer.id(),
                    start_at,
                    num_guests: 2,
                    notes: None,
                },
            )
            .await
            .expect("reservation insert failed");
        }
    }

    #[sqlx::test]
    #[ignore = "requires database"]
    async fn insert_then_get_roundtrips_fields(pool: PgPool) {
        let store = store(pool).await;
        let fields = CustomerFields::new("Ann", "Lee")
            .with_phone("555-0100")
            .with_notes("prefers the patio");

        let saved = CustomerStore::insert(&store, &NewCustomer::new(fields.clone()))
            .await
            .unwrap();
        let loaded = CustomerStore::get(&store, saved.id()).await.unwrap();

        assert_eq!(loaded.id(), saved.id());
        assert_eq!(loaded.fields, fields);
    }

    #[sqlx::test]
    #[ignore = "requires database"]
    async fn save_updates_existing_row(pool: PgPool) {
        let store = store(pool).await;
        let mut customer = Customer::from(NewCustomer::new(CustomerFields::new("Ann", "Lee")));
        let id = store.save(&mut customer).await.unwrap();

        customer.fields_mut().last_name = "Leigh".into();
        customer.fields_mut().phone = None;
        store.save(&mut customer).await.unwrap();

        let loaded = CustomerStore::get(&store, id).await.unwrap();
        assert_eq!(loaded.fields.last_name, "Leigh");
        assert_eq!(loaded.fields.phone, None);
    }

    #[sqlx::test]
    #[ignore = "requires database"]
    async fn get_missing_is_not_found(pool: PgPool) {
        let store = store(pool).await;
        let err = CustomerStore::get(&store, CustomerId::new(424242))
            .await
            .unwrap_err();
        assert_eq!(err.status(), 404);
    }

    #[sqlx::test]
    #[ignore = "requires database"]
    async fn search_matches_name_prefixes(pool: PgPool) {
        let store = store(pool).await;
        add(&store, "Ann", "Lee").await;
        add(&store, "Bob", "Lane").await;

        let hits = store.search("l").await.unwrap();
        assert_eq!(hits.len(), 2);

        let hits = store.search("An").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].full_name(), "Ann Lee");

        let all = store.list_all().await.unwrap();
        assert_eq!(store.search("").await.unwrap(), all);
    }

    #[sqlx::test]
    #[ignore = "requires database"]
    async fn top_ten_ranks_by_reservation_count(pool: PgPool) {
        let store = store(pool).await;
        let ann = add(&store, "Ann", "Lee").await;
        let bob = add(&store, "Bob", "Lane").await;
        add(&store, "Cal", "Moss").await;

        book(&store, &ann, 1).await;
        book(&store, &bob, 3).await;

        let top = store.top_ten().await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].customer.id(), bob.id());
        assert_eq!(top[0].reservation_count, 3);
        assert_eq!(top[1].customer.id(), ann.id());
    }

    #[sqlx::test]
    #[ignore = "requires database"]
    async fn top_ten_caps_rows_and_breaks_ties_by_name(pool: PgPool) {
        let store = store(pool).await;
        let names = [
            ("Yas", "Young"),
            ("Ada", "Adams"),
            ("Zed", "Lee"),
            ("Max", "Moss"),
            ("Amy", "Lee"),
            ("Cy", "Cole"),
            ("Hal", "Hart"),
            ("Dee", "Diaz"),
            ("Flo", "Fox"),
            ("Gus", "Gray"),
            ("Kit", "King"),
            ("Nia", "Ng"),
        ];
        for (first, last) in names {
            let customer = add(&store, first, last).await;
            book(&store, &customer, 1).await;
        }
        let regular = add(&store, "Zoe", "Zu").await;
        book(&store, &regular, 2).await;

        let top = store.top_ten().await.unwrap();
        assert_eq!(top.len(), TOP_CUSTOMERS_LIMIT);
        assert_eq!(top[0].customer.id(), regular.id());
        assert_eq!(top[0].reservation_count, 2);

        let tied: Vec<String> = top[1..].iter().map(|r| r.customer.full_name()).collect();
        assert_eq!(
            tied,
            [
                "Ada Adams",
                "Cy Cole",
                "Dee Diaz",
                "Flo Fox",
                "Gus Gray",
                "Hal Hart",
                "Kit King",
                "Amy Lee",
                "Zed Lee",
            ]
        );
        assert!(top[1..].iter().all(|r| r.reservation_count == 1));
    }

    #[sqlx::test]
    #[ignore = "requires database"]
    async fn search_passes_wildcards_through(pool: PgPool) {
        let store = store(pool).await;
        add(&store, "Ann", "Lee").await;
        add(&store, "Bob", "Moss").await;

        let hits = store.search("a_n").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].full_name(), "Ann Lee");

        let hits = store.search("%oss").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].full_name(), "Bob Moss");

        assert_eq!(store.search("_").await.unwrap().len(), 2);
        assert!(store.search("a\\_n").await.unwrap().is_empty());
    }
}
