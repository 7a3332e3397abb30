//! Request extractors shared by the handlers.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request, rejection::JsonRejection},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// The caller-supplied identity header required on most routes.
pub const SHARER_HEADER: &str = "X-Sharer-User-Id";

/// The acting user's id, read from the `X-Sharer-User-Id` header.
///
/// The service trusts the header as-is. A missing or malformed value is
/// rejected before the handler runs.
#[derive(Debug, Clone, Copy)]
pub struct SharerId(pub i64);

impl<S> FromRequestParts<S> for SharerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(SHARER_HEADER)
            .ok_or_else(|| AppError::validation(format!("{SHARER_HEADER} header is required")))?;

        let id = value
            .to_str()
            .ok()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .ok_or_else(|| {
                AppError::validation(format!("{SHARER_HEADER} header must be an integer id"))
            })?;

        Ok(SharerId(id))
    }
}

/// `Json` with its rejections rendered through the uniform error body.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(reject(rejection)),
        }
    }
}

fn reject(rejection: JsonRejection) -> AppError {
    AppError::validation(rejection.body_text())
}
