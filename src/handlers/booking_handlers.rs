//! HTTP handlers for the booking lifecycle.

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
    models::booking::{Booking, BookingState, CreateBooking},
    services::AppState,
};

/// Query params for the booking listings.
#[derive(Debug, Deserialize)]
pub struct StateQuery {
    pub state: Option<String>,
}

impl StateQuery {
    /// An absent `state` means `all`.
    fn parse(&self) -> Result<BookingState, AppError> {
        Ok(self.state.as_deref().unwrap_or("all").parse::<BookingState>()?)
    }
}

/// Query params for `PATCH /bookings/{id}`.
#[derive(Debug, Deserialize)]
pub struct ApproveQuery {
    pub approved: Option<bool>,
}

/// `POST /bookings`
pub async fn create_booking(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    ApiJson(payload): ApiJson<CreateBooking>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.bookings.create(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// `PATCH /bookings/{id}?approved=true|false`
pub async fn decide_booking(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i64>,
    Query(query): Query<ApproveQuery>,
) -> Result<Json<Booking>, AppError> {
    let approved = query
        .approved
        .ok_or_else(|| AppError::validation("approved parameter is required"))?;
    Ok(Json(state.bookings.change_status(id, user_id, approved).await?))
}

/// `GET /bookings/{id}`
pub async fn get_booking(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i64>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.bookings.get_by_id(id, user_id).await?))
}

/// `GET /bookings?state=...` — bookings made by the caller.
pub async fn list_bookings(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Query(query): Query<StateQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let state_filter = query.parse()?;
    Ok(Json(state.bookings.list_for_booker(user_id, state_filter).await?))
}

/// `GET /bookings/owner?state=...` — bookings for the caller's items.
pub async fn list_owner_bookings(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Query(query): Query<StateQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let state_filter = query.parse()?;
    Ok(Json(state.bookings.list_for_owner(user_id, state_filter).await?))
}
