//! Represents a registered user of the sharing service.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user.
///
/// Users act in two roles: as owners who publish items and decide on
/// booking requests, and as bookers who rent items and leave comments.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct User {
    /// Unique identifier assigned by the database.
    pub id: i64,

    /// Display name, shown next to comments.
    pub name: String,

    /// Contact email, unique across all users.
    pub email: String,
}

/// Payload for registering a new user.
///
/// Both fields are required. They are optional here so a missing field
/// surfaces as a validation error rather than a body-parse failure.
#[derive(Deserialize, Debug)]
pub struct CreateUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Payload for partially updating a user. Absent fields keep their value.
#[derive(Deserialize, Debug)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
}
