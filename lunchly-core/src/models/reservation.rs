//! Reservation records

use std::fmt;

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::CustomerId;

/// Storage-assigned reservation identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(i32);

impl ReservationId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for ReservationId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A reservation not yet written to storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    pub customer_id: CustomerId,
    pub start_at: NaiveDateTime,
    pub num_guests: i32,
    pub notes: Option<String>,
}

/// A reservation row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    id: ReservationId,
    pub customer_id: CustomerId,
    pub start_at: NaiveDateTime,
    pub num_guests: i32,
    pub notes: Option<String>,
}

impl Reservation {
    pub(crate) fn from_new(id: ReservationId, new: NewReservation) -> Self {
        Self {
            id,
            customer_id: new.customer_id,
            start_at: new.start_at,
            num_guests: new.num_guests,
            notes: new.notes,
        }
    }

    pub fn id(&self) -> ReservationId {
        self.id
    }

    /// e.g. "January 3rd 2024, 5:07 pm"
    pub fn formatted_start_at(&self) -> String {
        let day = self.start_at.day();
        format!(
            "{} {}{} {}",
            self.start_at.format("%B"),
            day,
            ordinal_suffix(day),
            self.start_at.format("%Y, %-I:%M %P"),
        )
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&(day % 100)) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}
