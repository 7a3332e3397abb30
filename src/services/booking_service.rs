//! BookingService — the booking lifecycle and its temporal queries.
//!
//! A booking is created `WAITING` by the renter, decided by the item's
//! owner, and listed through state filters evaluated against wall-clock
//! "now" at query time.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, SqlitePool, sqlite::Sqlite};
use std::sync::Arc;
use tracing::debug;

use crate::errors::{ShareError, ShareResult};
use crate::models::booking::{Booking, BookingRow, BookingState, BookingStatus, CreateBooking};
use crate::services::lookup;

/// Joined projection shared by every booking query. The item and the booker
/// come back in the same row so no follow-up lookups are needed.
const BOOKING_SELECT: &str = "SELECT b.id, b.start_date, b.end_date, b.status, \
     i.id AS item_id, i.name AS item_name, i.description AS item_description, \
     i.is_available AS item_available, i.owner_id AS item_owner_id, \
     i.request_id AS item_request_id, \
     u.id AS booker_id, u.name AS booker_name, u.email AS booker_email \
     FROM bookings b \
     JOIN items i ON i.id = b.item_id \
     JOIN users u ON u.id = b.booker_id";

/// Which side of a booking a listing filters on.
#[derive(Clone, Copy)]
enum Role {
    Booker,
    Owner,
}

#[derive(Clone)]
pub struct BookingService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

impl BookingService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Create a booking for an available item.
    ///
    /// The window must be well formed (strictly ordered, not in the past)
    /// and must not overlap an approved booking on the same item. Waiting
    /// and rejected bookings never block a new request.
    pub async fn create(&self, booker_id: i64, payload: CreateBooking) -> ShareResult<Booking> {
        let (start, end) = match (payload.start, payload.end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(ShareError::Validation(
                    "booking start and end are required".into(),
                ));
            }
        };

        let booker = lookup::fetch_user(&self.db, booker_id).await?;
        let item = lookup::fetch_item(&self.db, payload.item_id).await?;
        if !item.available {
            return Err(ShareError::ItemUnavailable(item.id));
        }
        ensure_window_well_formed(start, end, Utc::now())?;
        self.ensure_window_free(item.id, start, end).await?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO bookings (start_date, end_date, item_id, booker_id, status)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(start)
        .bind(end)
        .bind(item.id)
        .bind(booker.id)
        .bind(BookingStatus::Waiting)
        .fetch_one(&*self.db)
        .await?;
        debug!("booking {} created for item {} by user {}", id, item.id, booker.id);

        Ok(Booking {
            id,
            start,
            end,
            status: BookingStatus::Waiting,
            item,
            booker,
        })
    }

    /// Approve or reject a booking. Only the item's owner may decide, and a
    /// later call may overwrite an earlier decision.
    pub async fn change_status(
        &self,
        booking_id: i64,
        acting_user: i64,
        approve: bool,
    ) -> ShareResult<Booking> {
        let booking = self.fetch_booking(booking_id).await?;
        if booking.item.owner_id != acting_user {
            return Err(ShareError::NotOwner {
                user: acting_user,
                item: booking.item.id,
            });
        }

        let status = if approve {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };
        sqlx::query("UPDATE bookings SET status = ? WHERE id = ?")
            .bind(status)
            .bind(booking_id)
            .execute(&*self.db)
            .await?;
        debug!("booking {} decided as {:?} by owner {}", booking_id, status, acting_user);

        Ok(Booking { status, ..booking })
    }

    /// Fetch a booking, visible only to its booker or the item's owner.
    pub async fn get_by_id(&self, booking_id: i64, requesting_user: i64) -> ShareResult<Booking> {
        let booking = self.fetch_booking(booking_id).await?;
        if booking.booker.id != requesting_user && booking.item.owner_id != requesting_user {
            return Err(ShareError::NotBookerOrOwner {
                user: requesting_user,
                booking: booking_id,
            });
        }
        Ok(booking)
    }

    /// List the bookings a user has made, filtered by state.
    pub async fn list_for_booker(
        &self,
        user_id: i64,
        state: BookingState,
    ) -> ShareResult<Vec<Booking>> {
        lookup::fetch_user(&self.db, user_id).await?;
        self.list_filtered(Role::Booker, user_id, state).await
    }

    /// List the bookings made against any item the user owns, filtered by state.
    pub async fn list_for_owner(
        &self,
        user_id: i64,
        state: BookingState,
    ) -> ShareResult<Vec<Booking>> {
        lookup::fetch_user(&self.db, user_id).await?;
        self.list_filtered(Role::Owner, user_id, state).await
    }

    async fn fetch_booking(&self, id: i64) -> ShareResult<Booking> {
        let mut query = QueryBuilder::<Sqlite>::new(BOOKING_SELECT);
        query.push(" WHERE b.id = ");
        query.push_bind(id);

        let row = query
            .build_query_as::<BookingRow>()
            .fetch_one(&*self.db)
            .await
            .map_err(|err| match err {
                sqlx::Error::RowNotFound => ShareError::BookingNotFound(id),
                other => ShareError::Sqlx(other),
            })?;

        Ok(row.into())
    }

    /// Temporal states only consider approved bookings; `WAITING` and
    /// `REJECTED` filter on status alone.
    async fn list_filtered(
        &self,
        role: Role,
        user_id: i64,
        state: BookingState,
    ) -> ShareResult<Vec<Booking>> {
        let now = Utc::now();
        let column = match role {
            Role::Booker => "b.booker_id",
            Role::Owner => "i.owner_id",
        };

        let mut query = QueryBuilder::<Sqlite>::new(BOOKING_SELECT);
        query.push(" WHERE ");
        query.push(column);
        query.push(" = ");
        query.push_bind(user_id);

        match state {
            BookingState::All => {
                query.push(" ORDER BY b.id ASC");
            }
            BookingState::Future => {
                query.push(" AND b.status = ");
                query.push_bind(BookingStatus::Approved);
                query.push(" AND b.start_date > ");
                query.push_bind(now);
                query.push(" ORDER BY b.start_date DESC");
            }
            BookingState::Current => {
                query.push(" AND b.status = ");
                query.push_bind(BookingStatus::Approved);
                query.push(" AND b.start_date <= ");
                query.push_bind(now);
                query.push(" AND b.end_date >= ");
                query.push_bind(now);
                query.push(" ORDER BY b.start_date DESC");
            }
            BookingState::Past => {
                query.push(" AND b.status = ");
                query.push_bind(BookingStatus::Approved);
                query.push(" AND b.end_date < ");
                query.push_bind(now);
                query.push(" ORDER BY b.end_date DESC");
            }
            BookingState::Waiting => {
                query.push(" AND b.status = ");
                query.push_bind(BookingStatus::Waiting);
                query.push(" ORDER BY b.id ASC");
            }
            BookingState::Rejected => {
                query.push(" AND b.status = ");
                query.push_bind(BookingStatus::Rejected);
                query.push(" ORDER BY b.id ASC");
            }
        }

        let rows: Vec<BookingRow> = query.build_query_as().fetch_all(&*self.db).await?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    /// Reject a window that overlaps an approved booking on the same item.
    async fn ensure_window_free(
        &self,
        item_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ShareResult<()> {
        let clashes = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bookings
             WHERE item_id = ? AND status = ? AND start_date < ? AND ? < end_date",
        )
        .bind(item_id)
        .bind(BookingStatus::Approved)
        .bind(end)
        .bind(start)
        .fetch_one(&*self.db)
        .await?;

        if clashes > 0 {
            return Err(ShareError::WindowTaken(item_id));
        }
        Ok(())
    }
}

/// Reject windows the calendar can never honor: a start already behind
/// `now`, an end not ahead of it, then coinciding or inverted dates.
/// Position is checked before shape.
fn ensure_window_well_formed(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> ShareResult<()> {
    if start < now {
        return Err(ShareError::Validation(
            "booking start must not be in the past".into(),
        ));
    }
    if end <= now {
        return Err(ShareError::Validation(
            "booking end must be in the future".into(),
        ));
    }
    if start == end {
        return Err(ShareError::DatesCoincide);
    }
    if start > end {
        return Err(ShareError::StartAfterEnd);
    }
    Ok(())
}
