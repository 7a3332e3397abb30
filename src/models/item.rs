//! Represents a shareable item published by its owner.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::booking::BookingDates;
use super::comment::CommentView;

/// An item offered for rent.
///
/// `available` gates whether new bookings may target the item. Ownership is
/// fixed at creation; an item optionally points back to the request it was
/// published to answer.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier assigned by the database.
    pub id: i64,

    /// Short display name.
    pub name: String,

    /// Free-form description, searched by the text search endpoint.
    pub description: String,

    /// Whether the owner currently accepts bookings for this item.
    #[sqlx(rename = "is_available")]
    pub available: bool,

    /// The user who owns this item.
    pub owner_id: i64,

    /// The request this item was published in answer to, if any.
    pub request_id: Option<i64>,
}

/// An item as rendered for its detail view and the owner's listing,
/// enriched with comments and the bookings closest to "now" on either side.
///
/// `last_booking` and `next_booking` are only populated for the owner.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ItemWithBookings {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub last_booking: Option<BookingDates>,
    pub next_booking: Option<BookingDates>,
    pub comments: Vec<CommentView>,
}

/// Payload for publishing a new item.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
    pub request_id: Option<i64>,
}

/// Payload for partially updating an item. Absent fields keep their value.
#[derive(Deserialize, Debug)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}
