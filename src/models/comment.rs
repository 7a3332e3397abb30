//! Represents a comment left on an item after a finished rental.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A comment as rendered on the wire, with the author flattened to a name
/// and the creation time reduced to a calendar date.
#[derive(Serialize, Clone, FromRow, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: i64,
    pub text: String,
    pub item_id: i64,
    pub author_name: String,
    pub created: NaiveDate,
}

/// Payload for posting a comment.
#[derive(Deserialize, Debug)]
pub struct CreateComment {
    pub text: Option<String>,
}
