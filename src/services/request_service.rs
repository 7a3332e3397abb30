//! RequestService — item requests ("want ads") and the items answering them.

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{ShareError, ShareResult};
use crate::models::request::{AnswerItem, CreateRequest, ItemRequest, RequestWithItems};
use crate::services::lookup;

/// Row shape for items joined to the request they answer.
#[derive(FromRow)]
struct AnswerRow {
    id: i64,
    name: String,
    owner_id: i64,
    request_id: i64,
}

#[derive(Clone)]
pub struct RequestService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

impl RequestService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Post a new request on behalf of `requestor_id`.
    pub async fn create(
        &self,
        requestor_id: i64,
        payload: CreateRequest,
    ) -> ShareResult<ItemRequest> {
        let description = lookup::required_text(payload.description, "request description")?;
        let requestor = lookup::fetch_user(&self.db, requestor_id).await?;

        let request = sqlx::query_as::<_, ItemRequest>(
            "INSERT INTO requests (description, requestor_id, created)
             VALUES (?, ?, ?)
             RETURNING id, description, requestor_id, created",
        )
        .bind(&description)
        .bind(requestor.id)
        .bind(Utc::now())
        .fetch_one(&*self.db)
        .await?;

        Ok(request)
    }

    /// The user's own requests, newest first, each with its answers.
    pub async fn get_own(&self, user_id: i64) -> ShareResult<Vec<RequestWithItems>> {
        lookup::fetch_user(&self.db, user_id).await?;

        let requests = sqlx::query_as::<_, ItemRequest>(
            "SELECT id, description, requestor_id, created
             FROM requests WHERE requestor_id = ? ORDER BY created DESC",
        )
        .bind(user_id)
        .fetch_all(&*self.db)
        .await?;

        let answers = sqlx::query_as::<_, AnswerRow>(
            "SELECT i.id, i.name, i.owner_id, i.request_id
             FROM items i
             JOIN requests r ON r.id = i.request_id
             WHERE r.requestor_id = ?
             ORDER BY i.id",
        )
        .bind(user_id)
        .fetch_all(&*self.db)
        .await?;

        Ok(attach_answers(requests, answers))
    }

    /// Requests posted by everyone else, newest first, each with its answers.
    pub async fn get_all(&self, user_id: i64) -> ShareResult<Vec<RequestWithItems>> {
        let requests = sqlx::query_as::<_, ItemRequest>(
            "SELECT id, description, requestor_id, created
             FROM requests WHERE requestor_id != ? ORDER BY created DESC",
        )
        .bind(user_id)
        .fetch_all(&*self.db)
        .await?;

        let answers = sqlx::query_as::<_, AnswerRow>(
            "SELECT i.id, i.name, i.owner_id, i.request_id
             FROM items i
             JOIN requests r ON r.id = i.request_id
             WHERE r.requestor_id != ?
             ORDER BY i.id",
        )
        .bind(user_id)
        .fetch_all(&*self.db)
        .await?;

        Ok(attach_answers(requests, answers))
    }

    /// Fetch one request with its answers. Any known user may look.
    pub async fn get_by_id(&self, request_id: i64, user_id: i64) -> ShareResult<RequestWithItems> {
        lookup::fetch_user(&self.db, user_id).await?;
        let request = lookup::fetch_request(&self.db, request_id).await?;

        let answers = sqlx::query_as::<_, AnswerRow>(
            "SELECT i.id, i.name, i.owner_id, i.request_id
             FROM items i WHERE i.request_id = ? ORDER BY i.id",
        )
        .bind(request_id)
        .fetch_all(&*self.db)
        .await?;

        Ok(with_items(request, answers.into_iter().map(answer).collect()))
    }
}

fn answer(row: AnswerRow) -> AnswerItem {
    AnswerItem {
        id: row.id,
        name: row.name,
        owner_id: row.owner_id,
    }
}

fn with_items(request: ItemRequest, items: Vec<AnswerItem>) -> RequestWithItems {
    RequestWithItems {
        id: request.id,
        description: request.description,
        requestor_id: request.requestor_id,
        created: request.created,
        items,
    }
}

/// Group the answer rows under their requests. Requests with no answers get
/// an empty list.
fn attach_answers(requests: Vec<ItemRequest>, rows: Vec<AnswerRow>) -> Vec<RequestWithItems> {
    let mut answers_by_request: HashMap<i64, Vec<AnswerItem>> = HashMap::new();
    for row in rows {
        answers_by_request
            .entry(row.request_id)
            .or_default()
            .push(answer(row));
    }

    requests
        .into_iter()
        .map(|request| {
            let items = answers_by_request.remove(&request.id).unwrap_or_default();
            with_items(request, items)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};

    fn service(pool: SqlitePool) -> RequestService {
        RequestService::new(Arc::new(pool))
    }

    async fn seed_user(pool: &SqlitePool, name: &str, email: &str) -> i64 {
        sqlx::query_scalar::<_, i64>("INSERT INTO users (name, email) VALUES (?, ?) RETURNING id")
            .bind(name)
            .bind(email)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn seed_request(
        pool: &SqlitePool,
        requestor: i64,
        description: &str,
        created: DateTime<Utc>,
    ) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO requests (description, requestor_id, created)
             VALUES (?, ?, ?) RETURNING id",
        )
        .bind(description)
        .bind(requestor)
        .bind(created)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn seed_answer(pool: &SqlitePool, owner: i64, request: i64, name: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO items (name, description, is_available, owner_id, request_id)
             VALUES (?, ?, 1, ?, ?) RETURNING id",
        )
        .bind(name)
        .bind(format!("{name} for rent"))
        .bind(owner)
        .bind(request)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test]
    async fn lists_own_requests_newest_first_with_answers(pool: SqlitePool) {
        let requests = service(pool.clone());
        let asker = seed_user(&pool, "Asker", "asker@example.com").await;
        let helper = seed_user(&pool, "Helper", "helper@example.com").await;

        let older =
            seed_request(&pool, asker, "Need a drill", Utc::now() - Duration::days(1)).await;
        let newer = seed_request(&pool, asker, "Need a ladder", Utc::now()).await;
        seed_answer(&pool, helper, older, "Drill").await;

        let own = requests.get_own(asker).await.unwrap();
        assert_eq!(own.len(), 2);
        assert_eq!(own[0].id, newer);
        assert_eq!(own[1].id, older);
        assert!(own[0].items.is_empty());
        assert_eq!(own[1].items.len(), 1);
        assert_eq!(own[1].items[0].owner_id, helper);
    }

    #[sqlx::test]
    async fn create_requires_description_and_known_user(pool: SqlitePool) {
        let requests = service(pool.clone());
        let asker = seed_user(&pool, "Asker", "asker@example.com").await;

        let blank = requests
            .create(
                asker,
                CreateRequest {
                    description: Some("  ".into()),
                },
            )
            .await;
        assert!(matches!(blank, Err(ShareError::Validation(_))));

        let ghost = requests
            .create(
                99,
                CreateRequest {
                    description: Some("Need a drill".into()),
                },
            )
            .await;
        assert!(matches!(ghost, Err(ShareError::UserNotFound(99))));

        let posted = requests
            .create(
                asker,
                CreateRequest {
                    description: Some("Need a drill".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(posted.requestor_id, asker);
    }

    #[sqlx::test]
    async fn all_lists_only_other_users_requests(pool: SqlitePool) {
        let requests = service(pool.clone());
        let asker = seed_user(&pool, "Asker", "asker@example.com").await;
        let other = seed_user(&pool, "Other", "other@example.com").await;

        seed_request(&pool, asker, "Need a drill", Utc::now()).await;
        let foreign = seed_request(&pool, other, "Need a tent", Utc::now()).await;

        let visible = requests.get_all(asker).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, foreign);
    }

    #[sqlx::test]
    async fn get_by_id_checks_request_and_requesting_user(pool: SqlitePool) {
        let requests = service(pool.clone());
        let asker = seed_user(&pool, "Asker", "asker@example.com").await;
        let helper = seed_user(&pool, "Helper", "helper@example.com").await;

        let id = seed_request(&pool, asker, "Need a drill", Utc::now()).await;
        seed_answer(&pool, helper, id, "Drill").await;

        let viewed = requests.get_by_id(id, helper).await.unwrap();
        assert_eq!(viewed.items.len(), 1);
        assert_eq!(viewed.items[0].name, "Drill");

        let missing = requests.get_by_id(999, helper).await;
        assert!(matches!(missing, Err(ShareError::RequestNotFound(999))));

        let ghost_user = requests.get_by_id(id, 999).await;
        assert!(matches!(ghost_user, Err(ShareError::UserNotFound(999))));
    }
}
