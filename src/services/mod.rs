//! Service layer: the business rules for users, items, bookings and
//! requests, all backed by one shared SQLite pool.

pub mod booking_service;
pub mod item_service;
pub mod lookup;
pub mod request_service;
pub mod user_service;

use sqlx::SqlitePool;
use std::sync::Arc;

use booking_service::BookingService;
use item_service::ItemService;
use request_service::RequestService;
use user_service::UserService;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<SqlitePool>,
    pub users: UserService,
    pub items: ItemService,
    pub bookings: BookingService,
    pub requests: RequestService,
}

impl AppState {
    /// Wire all services to the same connection pool.
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self {
            users: UserService::new(db.clone()),
            items: ItemService::new(db.clone()),
            bookings: BookingService::new(db.clone()),
            requests: RequestService::new(db.clone()),
            db,
        }
    }
}
