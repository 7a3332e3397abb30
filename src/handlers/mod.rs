//! HTTP layer: extractors and per-resource handler modules.

pub mod booking_handlers;
pub mod extract;
pub mod health_handlers;
pub mod item_handlers;
pub mod request_handlers;
pub mod user_handlers;
