//! HTTP handlers for items, the item search and comments.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{
    errors::AppError,
    handlers::extract::{ApiJson, SharerId},
    models::comment::CreateComment,
    models::item::{CreateItem, Item, ItemWithBookings, UpdateItem},
    services::AppState,
};

/// Query params for `GET /items/search`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub text: Option<String>,
}

/// `GET /items` — the caller's own items with bookings and comments.
pub async fn list_items(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
) -> Result<Json<Vec<ItemWithBookings>>, AppError> {
    Ok(Json(state.items.get_by_owner(user_id).await?))
}

/// `GET /items/{id}`
pub async fn get_item(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i64>,
) -> Result<Json<ItemWithBookings>, AppError> {
    Ok(Json(state.items.get_by_id(id, user_id).await?))
}

/// `GET /items/search?text=...` — open to anonymous callers, no header needed.
pub async fn search_items(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Item>>, AppError> {
    let text = query.text.unwrap_or_default();
    Ok(Json(state.items.search(&text).await?))
}

/// `POST /items`
pub async fn create_item(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    ApiJson(payload): ApiJson<CreateItem>,
) -> Result<impl IntoResponse, AppError> {
    let item = state.items.create(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `PATCH /items/{id}`
pub async fn update_item(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<UpdateItem>,
) -> Result<Json<Item>, AppError> {
    Ok(Json(state.items.update(user_id, id, payload).await?))
}

/// `POST /items/{id}/comment`
pub async fn add_comment(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<CreateComment>,
) -> Result<impl IntoResponse, AppError> {
    let comment = state.items.add_comment(id, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
