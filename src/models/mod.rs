//! Core data models for the item-sharing service.
//!
//! These entities represent users, shareable items, bookings, item requests
//! and the comments left after a finished rental. They map cleanly to
//! database tables via `sqlx::FromRow` and serialize naturally as JSON via
//! `serde`.

pub mod booking;
pub mod comment;
pub mod item;
pub mod request;
pub mod user;
