//! Defines routes for the sharing service.
//!
//! ## Structure
//! - **Users**
//!   - `GET    /users` / `POST /users`
//!   - `GET    /users/{id}` / `PATCH /users/{id}` / `DELETE /users/{id}`
//!
//! - **Items**
//!   - `GET    /items` / `POST /items`
//!   - `GET    /items/search?text=`
//!   - `GET    /items/{id}` / `PATCH /items/{id}`
//!   - `POST   /items/{id}/comment`
//!
//! - **Bookings**
//!   - `POST   /bookings`
//!   - `GET    /bookings?state=` / `GET /bookings/owner?state=`
//!   - `GET    /bookings/{id}` / `PATCH /bookings/{id}?approved=`
//!
//! - **Requests**
//!   - `GET    /requests` / `POST /requests`
//!   - `GET    /requests/all`
//!   - `GET    /requests/{id}`
//!
//! Identity travels in the `X-Sharer-User-Id` header on every route that
//! needs a caller.

use crate::{
    handlers::{
        booking_handlers::{
            create_booking, decide_booking, get_booking, list_bookings, list_owner_bookings,
        },
        health_handlers::{healthz, readyz},
        item_handlers::{
            add_comment, create_item, get_item, list_items, search_items, update_item,
        },
        request_handlers::{create_request, get_request, list_other_requests, list_own_requests},
        user_handlers::{create_user, delete_user, get_user, list_users, update_user},
    },
    services::AppState,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Build and return the router for the whole HTTP surface.
///
/// The router carries shared state (`AppState`) to all handlers. Static
/// segments such as `/items/search` and `/bookings/owner` are registered
/// alongside the `{id}` captures; axum gives them precedence.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Users
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        // Items
        .route("/items", get(list_items).post(create_item))
        .route("/items/search", get(search_items))
        .route("/items/{id}", get(get_item).patch(update_item))
        .route("/items/{id}/comment", post(add_comment))
        // Bookings
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/owner", get(list_owner_bookings))
        .route("/bookings/{id}", get(get_booking).patch(decide_booking))
        // Requests
        .route("/requests", get(list_own_requests).post(create_request))
        .route("/requests/all", get(list_other_requests))
        .route("/requests/{id}", get(get_request))
}
