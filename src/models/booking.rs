//! Represents a booking: a request to rent an item for a time window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

use super::item::Item;
use super::user::User;
use crate::errors::ShareError;

/// Lifecycle status of a booking.
///
/// Every booking starts out `Waiting` and is moved to `Approved` or
/// `Rejected` by the item's owner. Stored as uppercase text in the database
/// and rendered the same way on the wire.
#[derive(Serialize, Deserialize, sqlx::Type, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
}

/// Temporal filter applied when listing bookings, evaluated against
/// wall-clock "now" at query time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookingState {
    All,
    Future,
    Current,
    Past,
    Waiting,
    Rejected,
}

impl FromStr for BookingState {
    type Err = ShareError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "FUTURE" => Ok(Self::Future),
            "CURRENT" => Ok(Self::Current),
            "PAST" => Ok(Self::Past),
            "WAITING" => Ok(Self::Waiting),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(ShareError::Validation(format!("Unknown state: {value}"))),
        }
    }
}

/// A booking with its item and booker resolved to full entities.
#[derive(Serialize, Clone, Debug)]
pub struct Booking {
    /// Unique identifier assigned by the database.
    pub id: i64,

    /// When the rental begins.
    pub start: DateTime<Utc>,

    /// When the rental ends.
    pub end: DateTime<Utc>,

    /// Current lifecycle status.
    pub status: BookingStatus,

    /// The item being rented.
    pub item: Item,

    /// The user renting the item.
    pub booker: User,
}

/// Flat row produced by the booking queries, which join the item and the
/// booker in one pass.
#[derive(FromRow, Debug)]
pub struct BookingRow {
    pub id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: BookingStatus,
    pub item_id: i64,
    pub item_name: String,
    pub item_description: String,
    pub item_available: bool,
    pub item_owner_id: i64,
    pub item_request_id: Option<i64>,
    pub booker_id: i64,
    pub booker_name: String,
    pub booker_email: String,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id,
            start: row.start_date,
            end: row.end_date,
            status: row.status,
            item: Item {
                id: row.item_id,
                name: row.item_name,
                description: row.item_description,
                available: row.item_available,
                owner_id: row.item_owner_id,
                request_id: row.item_request_id,
            },
            booker: User {
                id: row.booker_id,
                name: row.booker_name,
                email: row.booker_email,
            },
        }
    }
}

/// The reduced `{start, end}` view of a booking attached to item listings.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct BookingDates {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A booking's time window plus the item it belongs to, as fetched in bulk
/// when annotating an owner's items.
#[derive(FromRow, Clone, Debug)]
pub struct BookingSpan {
    pub item_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Payload for creating a booking.
///
/// The dates are required. A missing `itemId` falls back to zero, which no
/// item ever has, so it surfaces as not-found.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub item_id: i64,
}
