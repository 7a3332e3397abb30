use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// Convenience alias for service-layer results.
pub type ShareResult<T> = Result<T, ShareError>;

/// Errors raised by the service layer before they are rendered for the wire.
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("user with id {0} not found")]
    UserNotFound(i64),

    #[error("item with id {0} not found")]
    ItemNotFound(i64),

    #[error("booking with id {0} not found")]
    BookingNotFound(i64),

    #[error("request with id {0} not found")]
    RequestNotFound(i64),

    #[error("item with id {0} is not available for booking")]
    ItemUnavailable(i64),

    #[error("booking start and end must not coincide")]
    DatesCoincide,

    #[error("booking start must come before its end")]
    StartAfterEnd,

    #[error("item with id {0} is already booked for that period")]
    WindowTaken(i64),

    #[error("user with id {user} does not own item with id {item}")]
    NotOwner { user: i64, item: i64 },

    #[error("user with id {user} is neither booker nor owner for booking with id {booking}")]
    NotBookerOrOwner { user: i64, booking: i64 },

    #[error("user with id {user} has never rented item with id {item}")]
    NeverBooked { user: i64, item: i64 },

    #[error("user with id {user} has not finished renting item with id {item}")]
    RentalNotFinished { user: i64, item: i64 },

    #[error("email {0} is already registered")]
    EmailTaken(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// A lightweight wrapper that pairs an HTTP status with the error body
/// every endpoint renders on failure.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: &'static str,
    pub description: String,
}

impl AppError {
    /// Create a new AppError with a specific status, category and description.
    pub fn new(status: StatusCode, error: &'static str, description: impl Into<String>) -> Self {
        Self {
            status,
            error,
            description: description.into(),
        }
    }

    /// Shortcut for a 400 Bad Request raised by input validation.
    pub fn validation(description: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation error", description)
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(description: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error", description)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.error,
            "description": self.description
        }));

        (self.status, body).into_response()
    }
}

impl From<ShareError> for AppError {
    fn from(err: ShareError) -> Self {
        match err {
            ShareError::UserNotFound(_)
            | ShareError::ItemNotFound(_)
            | ShareError::BookingNotFound(_)
            | ShareError::RequestNotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, "not found", err.to_string())
            }
            ShareError::NotOwner { .. }
            | ShareError::NotBookerOrOwner { .. }
            | ShareError::NeverBooked { .. } => {
                Self::new(StatusCode::FORBIDDEN, "forbidden", err.to_string())
            }
            ShareError::EmailTaken(_) => {
                Self::new(StatusCode::CONFLICT, "duplicate", err.to_string())
            }
            ShareError::ItemUnavailable(_)
            | ShareError::DatesCoincide
            | ShareError::StartAfterEnd
            | ShareError::WindowTaken(_)
            | ShareError::RentalNotFinished { .. }
            | ShareError::Validation(_) => Self::validation(err.to_string()),
            ShareError::Sqlx(e) => {
                tracing::error!("database failure: {e}");
                Self::internal("unexpected database failure")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(err: ShareError) -> AppError {
        err.into()
    }

    #[test]
    fn each_error_lands_on_its_status_and_category() {
        let missing = rendered(ShareError::ItemNotFound(7));
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.error, "not found");

        let forbidden = rendered(ShareError::NotOwner { user: 1, item: 2 });
        assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
        assert_eq!(forbidden.error, "forbidden");

        let conflict = rendered(ShareError::EmailTaken("a@b.c".into()));
        assert_eq!(conflict.status, StatusCode::CONFLICT);
        assert_eq!(conflict.error, "duplicate");

        let invalid = rendered(ShareError::DatesCoincide);
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
        assert_eq!(invalid.error, "validation error");

        let broken = rendered(ShareError::Sqlx(sqlx::Error::PoolClosed));
        assert_eq!(broken.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(broken.error, "internal error");
    }

    #[test]
    fn descriptions_carry_the_offending_ids() {
        let err = rendered(ShareError::NeverBooked { user: 3, item: 9 });
        assert!(err.description.contains('3'));
        assert!(err.description.contains('9'));
    }
}
