//! Entity lookups and input checks shared across the services.

use sqlx::SqlitePool;

use crate::errors::{ShareError, ShareResult};
use crate::models::{item::Item, request::ItemRequest, user::User};

/// Fetch a user by id, mapping a missing row to `UserNotFound`.
pub async fn fetch_user(db: &SqlitePool, id: i64) -> ShareResult<User> {
    sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE id = ?")
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => ShareError::UserNotFound(id),
            other => ShareError::Sqlx(other),
        })
}

/// Fetch an item by id, mapping a missing row to `ItemNotFound`.
pub async fn fetch_item(db: &SqlitePool, id: i64) -> ShareResult<Item> {
    sqlx::query_as::<_, Item>(
        "SELECT id, name, description, is_available, owner_id, request_id
         FROM items WHERE id = ?",
    )
    .bind(id)
    .fetch_one(db)
    .await
    .map_err(|err| match err {
        sqlx::Error::RowNotFound => ShareError::ItemNotFound(id),
        other => ShareError::Sqlx(other),
    })
}

/// Fetch an item request by id, mapping a missing row to `RequestNotFound`.
pub async fn fetch_request(db: &SqlitePool, id: i64) -> ShareResult<ItemRequest> {
    sqlx::query_as::<_, ItemRequest>(
        "SELECT id, description, requestor_id, created FROM requests WHERE id = ?",
    )
    .bind(id)
    .fetch_one(db)
    .await
    .map_err(|err| match err {
        sqlx::Error::RowNotFound => ShareError::RequestNotFound(id),
        other => ShareError::Sqlx(other),
    })
}

/// Reject a missing or blank text field with a uniform validation message.
pub fn required_text(value: Option<String>, field: &str) -> ShareResult<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ShareError::Validation(format!("{field} must not be blank"))),
    }
}
