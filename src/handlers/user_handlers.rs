//! HTTP handlers for user accounts.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    errors::AppError,
    handlers::extract::ApiJson,
    models::user::{CreateUser, UpdateUser, User},
    services::AppState,
};

/// `GET /users`
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.users.get_all().await?))
}

/// `GET /users/{id}`
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, AppError> {
    Ok(Json(state.users.get_by_id(id).await?))
}

/// `POST /users`
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateUser>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.users.create(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `PATCH /users/{id}`
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<UpdateUser>,
) -> Result<Json<User>, AppError> {
    Ok(Json(state.users.update(id, payload).await?))
}

/// `DELETE /users/{id}`
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
