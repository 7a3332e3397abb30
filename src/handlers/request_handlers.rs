//! HTTP handlers for item requests.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    errors::AppError,
    handlers::extract::{ApiJson, SharerId},
    models::request::{CreateRequest, RequestWithItems},
    services::AppState,
};

/// `POST /requests`
pub async fn create_request(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    ApiJson(payload): ApiJson<CreateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let request = state.requests.create(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// `GET /requests` — the caller's own requests, with answering items.
pub async fn list_own_requests(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
) -> Result<Json<Vec<RequestWithItems>>, AppError> {
    Ok(Json(state.requests.get_own(user_id).await?))
}

/// `GET /requests/all` — everyone else's requests.
pub async fn list_other_requests(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
) -> Result<Json<Vec<RequestWithItems>>, AppError> {
    Ok(Json(state.requests.get_all(user_id).await?))
}

/// `GET /requests/{id}`
pub async fn get_request(
    State(state): State<AppState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i64>,
) -> Result<Json<RequestWithItems>, AppError> {
    Ok(Json(state.requests.get_by_id(id, user_id).await?))
}
