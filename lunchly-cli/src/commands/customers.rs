//! Customers command - list, search, rank and edit customer records

use std::io::Write;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lunchly_core::{
    Customer, CustomerFields, CustomerId, CustomerStore, NewCustomer, PersistedCustomer,
    RankedCustomer, Reservation, ReservationStore,
};
use serde::Serialize;
use tracing::info;

use super::{non_empty, write_json};

#[derive(Parser, Debug)]
#[command(about = "List, search, rank and edit customers")]
pub struct CustomersArgs {
    #[command(subcommand)]
    pub command: CustomersCommand,
}

#[derive(Subcommand, Debug)]
pub enum CustomersCommand {
    /// List every customer, ordered by last name then first name
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Find customers whose first, last or full name starts with TERM
    ///
    /// Matching ignores case. `%` and `_` in TERM act as SQL wildcards.
    Search {
        /// Name prefix to look for
        term: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one customer and their reservations
    Show {
        /// Customer ID
        id: i32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Top ten customers by number of reservations
    Top {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a customer
    Add {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit a customer (omitted fields are unchanged, "" clears phone or notes)
    Edit {
        /// Customer ID
        id: i32,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Serialize)]
struct CustomerDetail<'a> {
    #[serde(flatten)]
    customer: &'a PersistedCustomer,
    reservations: &'a [Reservation],
}

pub async fn run_customers<S, W>(args: CustomersArgs, store: &S, out: &mut W) -> Result<()>
where
    S: CustomerStore + ReservationStore,
    W: Write,
{
    match args.command {
        CustomersCommand::List { json } => {
            let customers = store.list_all().await.context("failed to list customers")?;
            print_customers(out, &customers, json)
        }
        CustomersCommand::Search { term, json } => {
            let customers = store
                .search(&term)
                .await
                .with_context(|| format!("failed to search customers for '{}'", term))?;
            print_customers(out, &customers, json)
        }
        CustomersCommand::Show { id, json } => {
            let customer = CustomerStore::get(store, CustomerId::new(id)).await?;
            let reservations = customer.reservations(store).await?;
            if json {
                write_json(
                    out,
                    &CustomerDetail {
                        customer: &customer,
                        reservations: &reservations,
                    },
                )
            } else {
                print_detail(out, &customer, &reservations)
            }
        }
        CustomersCommand::Top { json } => {
            let ranked = store.top_ten().await.context("failed to rank customers")?;
            print_ranked(out, &ranked, json)
        }
        CustomersCommand::Add {
            first_name,
            last_name,
            phone,
            notes,
        } => {
            let mut customer = Customer::from(NewCustomer::new(CustomerFields {
                first_name,
                last_name,
                phone: phone.and_then(non_empty),
                notes: notes.and_then(non_empty),
            }));
            let id = store.save(&mut customer).await?;
            info!(customer_id = %id, "added customer");
            writeln!(out, "Added customer #{}: {}", id, customer.full_name())?;
            Ok(())
        }
        CustomersCommand::Edit {
            id,
            first_name,
            last_name,
            phone,
            notes,
        } => {
            let mut customer = Customer::from(CustomerStore::get(store, CustomerId::new(id)).await?);
            let fields = customer.fields_mut();
            if let Some(first_name) = first_name {
                fields.first_name = first_name;
            }
            if let Some(last_name) = last_name {
                fields.last_name = last_name;
            }
            if let Some(phone) = phone {
                fields.phone = non_empty(phone);
            }
            if let Some(notes) = notes {
                fields.notes = non_empty(notes);
            }
            store.save(&mut customer).await?;
            writeln!(out, "Updated customer #{}: {}", id, customer.full_name())?;
            Ok(())
        }
    }
}

fn print_customers<W: Write>(out: &mut W, customers: &[PersistedCustomer], json: bool) -> Result<()> {
    if json {
        return write_json(out, customers);
    }
    if customers.is_empty() {
        writeln!(out, "No customers found")?;
        return Ok(());
    }
    for customer in customers {
        writeln!(out, "{:>5}  {}", customer.id(), customer.full_name())?;
    }
    Ok(())
}

fn print_ranked<W: Write>(out: &mut W, ranked: &[RankedCustomer], json: bool) -> Result<()> {
    if json {
        return write_json(out, ranked);
    }
    for (rank, entry) in ranked.iter().enumerate() {
        writeln!(
            out,
            "{:>2}. {} ({} reservations)",
            rank + 1,
            entry.customer.full_name(),
            entry.reservation_count
        )?;
    }
    Ok(())
}

fn print_detail<W: Write>(
    out: &mut W,
    customer: &PersistedCustomer,
    reservations: &[Reservation],
) -> Result<()> {
    writeln!(out, "#{} {}", customer.id(), customer.full_name())?;
    if let Some(phone) = &customer.fields.phone {
        writeln!(out, "Phone: {}", phone)?;
    }
    if let Some(notes) = &customer.fields.notes {
        writeln!(out, "Notes: {}", notes)?;
    }
    writeln!(out)?;
    if reservations.is_empty() {
        writeln!(out, "No reservations")?;
    }
    for reservation in reservations {
        write!(
            out,
            "  #{} {} for {}",
            reservation.id(),
            reservation.formatted_start_at(),
            reservation.num_guests
        )?;
        match &reservation.notes {
            Some(notes) => writeln!(out, " - {}", notes)?,
            None => writeln!(out)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lunchly_core::{MemoryStore, NewReservation, StoreError};

    async fn run(store: &MemoryStore, command: CustomersCommand) -> Result<String> {
        let mut out = Vec::new();
        run_customers(CustomersArgs { command }, store, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    async fn add(store: &MemoryStore, first: &str, last: &str) -> String {
        run(
            store,
            CustomersCommand::Add {
                first_name: first.into(),
                last_name: last.into(),
                phone: None,
                notes: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn add_then_list() {
        let store = MemoryStore::new();
        assert_eq!(add(&store, "Ann", "Lee").await, "Added customer #1: Ann Lee\n");
        add(&store, "Bob", "Lane").await;

        let listing = run(&store, CustomersCommand::List { json: false }).await.unwrap();
        let lines: Vec<_> = listing.lines().collect();
        assert_eq!(lines, ["    2  Bob Lane", "    1  Ann Lee"]);
    }

    #[tokio::test]
    async fn search_json_output() {
        let store = MemoryStore::new();
        add(&store, "Ann", "Lee").await;
        add(&store, "Bob", "Lane").await;

        let output = run(
            &store,
            CustomersCommand::Search {
                term: "an".into(),
                json: true,
            },
        )
        .await
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["first_name"], "Ann");
    }

    #[tokio::test]
    async fn edit_keeps_omitted_fields_and_clears_empty() {
        let store = MemoryStore::new();
        run(
            &store,
            CustomersCommand::Add {
                first_name: "Ann".into(),
                last_name: "Lee".into(),
                phone: Some("555-0100".into()),
                notes: Some("booth".into()),
            },
        )
        .await
        .unwrap();

        run(
            &store,
            CustomersCommand::Edit {
                id: 1,
                first_name: None,
                last_name: Some("Leigh".into()),
                phone: Some(String::new()),
                notes: None,
            },
        )
        .await
        .unwrap();

        let customer = CustomerStore::get(&store, CustomerId::new(1)).await.unwrap();
        assert_eq!(customer.full_name(), "Ann Leigh");
        assert_eq!(customer.fields.phone, None);
        assert_eq!(customer.fields.notes.as_deref(), Some("booth"));
    }

    #[tokio::test]
    async fn show_missing_customer_is_not_found() {
        let store = MemoryStore::new();
        let err = run(&store, CustomersCommand::Show { id: 8, json: false })
            .await
            .unwrap_err();
        let store_err = err.downcast_ref::<StoreError>().unwrap();
        assert!(store_err.is_not_found());
    }

    #[tokio::test]
    async fn show_lists_reservations_and_top_ranks() {
        let store = MemoryStore::new();
        add(&store, "Ann", "Lee").await;
        ReservationStore::insert(
            &store,
            &NewReservation {
                customer_id: CustomerId::new(1),
                start_at: NaiveDate::from_ymd_opt(2024, 2, 2)
                    .unwrap()
                    .and_hms_opt(18, 45, 0)
                    .unwrap(),
                num_guests: 4,
                notes: Some("high chair".into()),
            },
        )
        .await
        .unwrap();

        let detail = run(&store, CustomersCommand::Show { id: 1, json: false })
            .await
            .unwrap();
        assert!(detail.starts_with("#1 Ann Lee\n"));
        assert!(detail.contains("February 2nd 2024, 6:45 pm for 4 - high chair"));

        let top = run(&store, CustomersCommand::Top { json: false }).await.unwrap();
        assert_eq!(top, " 1. Ann Lee (1 reservations)\n");
    }
}
