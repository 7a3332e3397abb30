//! Represents a request for an item nobody has published yet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A want-ad posted by a user looking for an item to rent.
///
/// Read-only after creation; other users answer it by publishing items that
/// point back at it.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    /// Unique identifier assigned by the database.
    pub id: i64,

    /// What the requestor is looking for.
    pub description: String,

    /// The user who posted the request.
    pub requestor_id: i64,

    /// When the request was posted.
    pub created: DateTime<Utc>,
}

/// A short reference to an item published in answer to a request.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AnswerItem {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
}

/// A request together with the items published in answer to it.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RequestWithItems {
    pub id: i64,
    pub description: String,
    pub requestor_id: i64,
    pub created: DateTime<Utc>,
    pub items: Vec<AnswerItem>,
}

/// Payload for posting a new item request.
#[derive(Deserialize, Debug)]
pub struct CreateRequest {
    pub description: Option<String>,
}
