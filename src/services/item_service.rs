//! ItemService — item publication, text search, the comment gate and the
//! closest-booking annotations on item views.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{ShareError, ShareResult};
use crate::models::booking::{BookingDates, BookingSpan};
use crate::models::comment::{CommentView, CreateComment};
use crate::models::item::{CreateItem, Item, ItemWithBookings, UpdateItem};
use crate::services::lookup;

#[derive(Clone)]
pub struct ItemService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

impl ItemService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Publish a new item owned by `owner_id`.
    pub async fn create(&self, owner_id: i64, payload: CreateItem) -> ShareResult<Item> {
        let name = lookup::required_text(payload.name, "item name")?;
        let description = lookup::required_text(payload.description, "item description")?;
        let Some(available) = payload.available else {
            return Err(ShareError::Validation(
                "item availability must be provided".into(),
            ));
        };

        let owner = lookup::fetch_user(&self.db, owner_id).await?;
        if let Some(request_id) = payload.request_id {
            lookup::fetch_request(&self.db, request_id).await?;
        }

        let item = sqlx::query_as::<_, Item>(
            "INSERT INTO items (name, description, is_available, owner_id, request_id)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id, name, description, is_available, owner_id, request_id",
        )
        .bind(&name)
        .bind(&description)
        .bind(available)
        .bind(owner.id)
        .bind(payload.request_id)
        .fetch_one(&*self.db)
        .await?;

        Ok(item)
    }

    /// Partially update an item. Only the owner may edit; absent or blank
    /// fields keep their stored value.
    pub async fn update(
        &self,
        user_id: i64,
        item_id: i64,
        payload: UpdateItem,
    ) -> ShareResult<Item> {
        let current = lookup::fetch_item(&self.db, item_id).await?;
        if current.owner_id != user_id {
            return Err(ShareError::NotOwner {
                user: user_id,
                item: item_id,
            });
        }

        let name = payload
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(current.name);
        let description = payload
            .description
            .filter(|description| !description.trim().is_empty())
            .unwrap_or(current.description);
        let available = payload.available.unwrap_or(current.available);

        let item = sqlx::query_as::<_, Item>(
            "UPDATE items SET name = ?, description = ?, is_available = ? WHERE id = ?
             RETURNING id, name, description, is_available, owner_id, request_id",
        )
        .bind(&name)
        .bind(&description)
        .bind(available)
        .bind(item_id)
        .fetch_one(&*self.db)
        .await?;

        Ok(item)
    }

    /// Fetch one item with its comments. The closest bookings are revealed
    /// only to the owner.
    pub async fn get_by_id(
        &self,
        item_id: i64,
        requesting_user: i64,
    ) -> ShareResult<ItemWithBookings> {
        let item = lookup::fetch_item(&self.db, item_id).await?;
        let comments = self.comments_for_item(item.id).await?;

        let (last, next) = if item.owner_id == requesting_user {
            // The detail view draws from every booking of the owner, not
            // just this item's. Only the grouped listing separates items.
            let spans = self.owner_spans(item.owner_id).await?;
            closest_bookings(&spans, Utc::now())
        } else {
            (None, None)
        };

        Ok(item_view(item, last, next, comments))
    }

    /// List the owner's items, each annotated with its comments and the
    /// bookings closest to "now". Bookings and comments are fetched once
    /// for the whole listing and grouped in memory.
    pub async fn get_by_owner(&self, owner_id: i64) -> ShareResult<Vec<ItemWithBookings>> {
        lookup::fetch_user(&self.db, owner_id).await?;

        let items = sqlx::query_as::<_, Item>(
            "SELECT id, name, description, is_available, owner_id, request_id
             FROM items WHERE owner_id = ? ORDER BY id",
        )
        .bind(owner_id)
        .fetch_all(&*self.db)
        .await?;

        let mut spans_by_item: HashMap<i64, Vec<BookingSpan>> = HashMap::new();
        for span in self.owner_spans(owner_id).await? {
            spans_by_item.entry(span.item_id).or_default().push(span);
        }

        let comments = sqlx::query_as::<_, CommentView>(
            "SELECT c.id, c.text, c.item_id, u.name AS author_name, date(c.created) AS created
             FROM comments c
             JOIN users u ON u.id = c.author_id
             JOIN items i ON i.id = c.item_id
             WHERE i.owner_id = ?
             ORDER BY c.id",
        )
        .bind(owner_id)
        .fetch_all(&*self.db)
        .await?;
        let mut comments_by_item: HashMap<i64, Vec<CommentView>> = HashMap::new();
        for comment in comments {
            comments_by_item
                .entry(comment.item_id)
                .or_default()
                .push(comment);
        }

        let now = Utc::now();
        let annotated = items
            .into_iter()
            .map(|item| {
                let spans = spans_by_item.remove(&item.id).unwrap_or_default();
                let comments = comments_by_item.remove(&item.id).unwrap_or_default();
                let (last, next) = closest_bookings(&spans, now);
                item_view(item, last, next, comments)
            })
            .collect();

        Ok(annotated)
    }

    /// Case-insensitive text search over available items. Blank text
    /// matches nothing.
    pub async fn search(&self, text: &str) -> ShareResult<Vec<Item>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let pattern = format!("%{text}%");
        let items = sqlx::query_as::<_, Item>(
            "SELECT id, name, description, is_available, owner_id, request_id
             FROM items
             WHERE is_available = 1 AND (name LIKE ? OR description LIKE ?)
             ORDER BY id",
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&*self.db)
        .await?;

        Ok(items)
    }

    /// Attach a comment to an item. Only a user whose earliest booking of
    /// the item has already ended may comment; the booking's status is not
    /// consulted.
    pub async fn add_comment(
        &self,
        item_id: i64,
        author_id: i64,
        payload: CreateComment,
    ) -> ShareResult<CommentView> {
        let text = lookup::required_text(payload.text, "comment text")?;
        let item = lookup::fetch_item(&self.db, item_id).await?;
        let author = lookup::fetch_user(&self.db, author_id).await?;

        let earliest_end = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT end_date FROM bookings
             WHERE booker_id = ? AND item_id = ?
             ORDER BY end_date ASC LIMIT 1",
        )
        .bind(author.id)
        .bind(item.id)
        .fetch_optional(&*self.db)
        .await?;

        let Some(earliest_end) = earliest_end else {
            return Err(ShareError::NeverBooked {
                user: author.id,
                item: item.id,
            });
        };
        let now = Utc::now();
        if earliest_end >= now {
            return Err(ShareError::RentalNotFinished {
                user: author.id,
                item: item.id,
            });
        }

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO comments (text, item_id, author_id, created)
             VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&text)
        .bind(item.id)
        .bind(author.id)
        .bind(now)
        .fetch_one(&*self.db)
        .await?;

        Ok(CommentView {
            id,
            text,
            item_id: item.id,
            author_name: author.name,
            created: now.date_naive(),
        })
    }

    /// Every booking window on every item the owner owns.
    async fn owner_spans(&self, owner_id: i64) -> ShareResult<Vec<BookingSpan>> {
        let spans = sqlx::query_as::<_, BookingSpan>(
            "SELECT b.item_id, b.start_date, b.end_date
             FROM bookings b
             JOIN items i ON i.id = b.item_id
             WHERE i.owner_id = ?",
        )
        .bind(owner_id)
        .fetch_all(&*self.db)
        .await?;
        Ok(spans)
    }

    async fn comments_for_item(&self, item_id: i64) -> ShareResult<Vec<CommentView>> {
        let comments = sqlx::query_as::<_, CommentView>(
            "SELECT c.id, c.text, c.item_id, u.name AS author_name, date(c.created) AS created
             FROM comments c
             JOIN users u ON u.id = c.author_id
             WHERE c.item_id = ?
             ORDER BY c.id",
        )
        .bind(item_id)
        .fetch_all(&*self.db)
        .await?;
        Ok(comments)
    }
}

/// Pick the booking windows closest to `now` on either side: among windows
/// running right now, the one ending latest; among upcoming windows, the
/// one starting soonest. Status is not consulted.
fn closest_bookings(
    spans: &[BookingSpan],
    now: DateTime<Utc>,
) -> (Option<BookingDates>, Option<BookingDates>) {
    let last = spans
        .iter()
        .filter(|span| span.start_date < now && now < span.end_date)
        .max_by_key(|span| span.end_date)
        .map(|span| BookingDates {
            start: span.start_date,
            end: span.end_date,
        });

    let next = spans
        .iter()
        .filter(|span| span.start_date > now)
        .min_by_key(|span| span.start_date)
        .map(|span| BookingDates {
            start: span.start_date,
            end: span.end_date,
        });

    (last, next)
}

fn item_view(
    item: Item,
    last: Option<BookingDates>,
    next: Option<BookingDates>,
    comments: Vec<CommentView>,
) -> ItemWithBookings {
    ItemWithBookings {
        id: item.id,
        name: item.name,
        description: item.description,
        available: item.available,
        last_booking: last,
        next_booking: next,
        comments,
    }
}
