//! Reservations command - book and edit reservations

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use lunchly_core::{
    CustomerId, CustomerStore, NewReservation, Reservation, ReservationId, ReservationStore,
};
use tracing::info;

use super::non_empty;

/// Accepted `--start-at` layout
const START_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Parser, Debug)]
#[command(about = "Book and edit reservations")]
pub struct ReservationsArgs {
    #[command(subcommand)]
    pub command: ReservationsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ReservationsCommand {
    /// Book a reservation for an existing customer
    Add {
        /// Customer ID
        #[arg(long)]
        customer: i32,
        /// Start time, "YYYY-MM-DD HH:MM"
        #[arg(long, value_parser = parse_start_at)]
        start_at: NaiveDateTime,
        /// Number of guests
        #[arg(long)]
        guests: i32,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit a reservation (omitted fields are unchanged, "" clears notes)
    Edit {
        /// Reservation ID
        id: i32,
        /// Start time, "YYYY-MM-DD HH:MM"
        #[arg(long, value_parser = parse_start_at)]
        start_at: Option<NaiveDateTime>,
        #[arg(long)]
        guests: Option<i32>,
        #[arg(long)]
        notes: Option<String>,
    },
}

fn parse_start_at(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value.trim(), START_AT_FORMAT)
        .map_err(|err| format!("expected \"YYYY-MM-DD HH:MM\": {}", err))
}

pub async fn run_reservations<S, W>(args: ReservationsArgs, store: &S, out: &mut W) -> Result<()>
where
    S: CustomerStore + ReservationStore,
    W: Write,
{
    match args.command {
        ReservationsCommand::Add {
            customer,
            start_at,
            guests,
            notes,
        } => {
            // Look the customer up first so a bad id reports as not found
            let customer = CustomerStore::get(store, CustomerId::new(customer)).await?;
            let reservation = ReservationStore::insert(
                store,
                &NewReservation {
                    customer_id: customer.id(),
                    start_at,
                    num_guests: guests,
                    notes: notes.and_then(non_empty),
                },
            )
            .await?;
            info!(
                reservation_id = %reservation.id(),
                customer_id = %customer.id(),
                "booked reservation"
            );
            writeln!(
                out,
                "Booked reservation #{} for {}: {}",
                reservation.id(),
                customer.full_name(),
                describe(&reservation)
            )?;
            Ok(())
        }
        ReservationsCommand::Edit {
            id,
            start_at,
            guests,
            notes,
        } => {
            let mut reservation = ReservationStore::get(store, ReservationId::new(id)).await?;
            if let Some(start_at) = start_at {
                reservation.start_at = start_at;
            }
            if let Some(guests) = guests {
                reservation.num_guests = guests;
            }
            if let Some(notes) = notes {
                reservation.notes = non_empty(notes);
            }
            ReservationStore::update(store, &reservation).await?;
            writeln!(
                out,
                "Updated reservation #{}: {}",
                reservation.id(),
                describe(&reservation)
            )?;
            Ok(())
        }
    }
}

fn describe(reservation: &Reservation) -> String {
    format!(
        "{}, {} guests",
        reservation.formatted_start_at(),
        reservation.num_guests
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lunchly_core::{CustomerFields, MemoryStore, NewCustomer, StoreError};

    fn at(day: u32, hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    async fn run(store: &MemoryStore, command: ReservationsCommand) -> Result<String> {
        let mut out = Vec::new();
        run_reservations(ReservationsArgs { command }, store, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    async fn store_with_customer() -> MemoryStore {
        let store = MemoryStore::new();
        CustomerStore::insert(&store, &NewCustomer::new(CustomerFields::new("Ann", "Lee")))
            .await
            .unwrap();
        store
    }

    #[test]
    fn start_at_parsing() {
        assert_eq!(parse_start_at("2024-03-01 19:30").unwrap(), at(1, 19, 30));
        assert_eq!(parse_start_at(" 2024-03-01 07:05 ").unwrap(), at(1, 7, 5));
        assert!(parse_start_at("2024-03-01").is_err());
        assert!(parse_start_at("03/01/2024 7:30 pm").is_err());
    }

    #[tokio::test]
    async fn add_books_for_customer() {
        let store = store_with_customer().await;
        let output = run(
            &store,
            ReservationsCommand::Add {
                customer: 1,
                start_at: at(1, 19, 30),
                guests: 2,
                notes: Some(String::new()),
            },
        )
        .await
        .unwrap();
        assert_eq!(
            output,
            "Booked reservation #1 for Ann Lee: March 1st 2024, 7:30 pm, 2 guests\n"
        );

        let booked = ReservationStore::get(&store, ReservationId::new(1)).await.unwrap();
        assert_eq!(booked.customer_id, CustomerId::new(1));
        assert_eq!(booked.notes, None);
    }

    #[tokio::test]
    async fn add_for_unknown_customer_is_not_found() {
        let store = MemoryStore::new();
        let err = run(
            &store,
            ReservationsCommand::Add {
                customer: 42,
                start_at: at(1, 12, 0),
                guests: 1,
                notes: None,
            },
        )
        .await
        .unwrap_err();
        let store_err = err.downcast_ref::<StoreError>().unwrap();
        assert!(store_err.is_not_found());
        assert_eq!(store_err.to_string(), "No such customer: 42");
    }

    #[tokio::test]
    async fn edit_changes_only_given_fields() {
        let store = store_with_customer().await;
        run(
            &store,
            ReservationsCommand::Add {
                customer: 1,
                start_at: at(1, 19, 30),
                guests: 2,
                notes: Some("window".into()),
            },
        )
        .await
        .unwrap();

        run(
            &store,
            ReservationsCommand::Edit {
                id: 1,
                start_at: None,
                guests: Some(6),
                notes: None,
            },
        )
        .await
        .unwrap();

        let edited = ReservationStore::get(&store, ReservationId::new(1)).await.unwrap();
        assert_eq!(edited.start_at, at(1, 19, 30));
        assert_eq!(edited.num_guests, 6);
        assert_eq!(edited.notes.as_deref(), Some("window"));
    }

    #[tokio::test]
    async fn edit_missing_reservation_is_not_found() {
        let store = MemoryStore::new();
        let err = run(
            &store,
            ReservationsCommand::Edit {
                id: 9,
                start_at: None,
                guests: None,
                notes: None,
            },
        )
        .await
        .unwrap_err();
        assert!(err.downcast_ref::<StoreError>().unwrap().is_not_found());
    }
}
