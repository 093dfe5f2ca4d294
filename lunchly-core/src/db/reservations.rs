//! Reservation queries

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::FromRow;
use tracing::{debug, warn};

use super::PgStore;
use crate::error::{Result, StoreError};
use crate::models::{CustomerId, NewReservation, Reservation, ReservationId};
use crate::store::ReservationStore;

/// Reservation record from database
#[derive(Debug, FromRow)]
struct ReservationRow {
    id: i32,
    customer_id: i32,
    start_at: NaiveDateTime,
    num_guests: i32,
    notes: Option<String>,
}

impl From<ReservationRow> for Reservation {
    fn from(r: ReservationRow) -> Self {
        Reservation::from_new(
            ReservationId::new(r.id),
            NewReservation {
                customer_id: CustomerId::new(r.customer_id),
                start_at: r.start_at,
                num_guests: r.num_guests,
                notes: r.notes,
            },
        )
    }
}

#[async_trait]
impl ReservationStore for PgStore {
    async fn for_customer(&self, customer_id: CustomerId) -> Result<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(
            r#"
            SELECT id, customer_id, start_at, num_guests, notes
            FROM reservations
            WHERE customer_id = $1
            ORDER BY start_at, id
            "#,
        )
        .bind(customer_id.get())
        .fetch_all(self.pool())
        .await?;

        debug!(customer_id = %customer_id, count = rows.len(), "loaded reservations");
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: ReservationId) -> Result<Reservation> {
        let row: ReservationRow = sqlx::query_as(
            r#"
            SELECT id, customer_id, start_at, num_guests, notes
            FROM reservations
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| StoreError::reservation_not_found(id.get()))?;

        Ok(row.into())
    }

    async fn insert(&self, reservation: &NewReservation) -> Result<Reservation> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO reservations (customer_id, start_at, num_guests, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(reservation.customer_id.get())
        .bind(reservation.start_at)
        .bind(reservation.num_guests)
        .bind(reservation.notes.as_deref())
        .fetch_one(self.pool())
        .await?;

        debug!(reservation_id = id, customer_id = %reservation.customer_id, "inserted reservation");
        Ok(Reservation::from_new(
            ReservationId::new(id),
            reservation.clone(),
        ))
    }

    async fn update(&self, reservation: &Reservation) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET customer_id = $1,
                start_at = $2,
                num_guests = $3,
                notes = $4
            WHERE id = $5
            "#,
        )
        .bind(reservation.customer_id.get())
        .bind(reservation.start_at)
        .bind(reservation.num_guests)
        .bind(reservation.notes.as_deref())
        .bind(reservation.id().get())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            warn!(reservation_id = %reservation.id(), "update matched no reservation row");
        }
        Ok(())
    }
}
