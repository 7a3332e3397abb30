//! UserService — account registration and profile management.

use sqlx::{QueryBuilder, SqlitePool, sqlite::Sqlite};
use std::sync::Arc;

use crate::errors::{ShareError, ShareResult};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::services::lookup;

/// CRUD over user accounts. The unique-email rule is checked up front and
/// backstopped by the unique index on the `users` table.
#[derive(Clone)]
pub struct UserService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

impl UserService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// List every registered user.
    pub async fn get_all(&self) -> ShareResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT id, name, email FROM users ORDER BY id")
            .fetch_all(&*self.db)
            .await?;
        Ok(users)
    }

    /// Fetch a single user by id.
    pub async fn get_by_id(&self, id: i64) -> ShareResult<User> {
        lookup::fetch_user(&self.db, id).await
    }

    /// Register a new user.
    pub async fn create(&self, payload: CreateUser) -> ShareResult<User> {
        let name = lookup::required_text(payload.name, "user name")?;
        let email = lookup::required_text(payload.email, "user email")?;
        ensure_email_valid(&email)?;
        self.ensure_email_free(&email, None).await?;

        match sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email) VALUES (?, ?) RETURNING id, name, email",
        )
        .bind(&name)
        .bind(&email)
        .fetch_one(&*self.db)
        .await
        {
            Ok(user) => Ok(user),
            Err(err) if is_unique_violation(&err) => Err(ShareError::EmailTaken(email)),
            Err(err) => Err(ShareError::Sqlx(err)),
        }
    }

    /// Partially update a user. Absent or blank fields keep their stored value.
    pub async fn update(&self, id: i64, payload: UpdateUser) -> ShareResult<User> {
        let current = lookup::fetch_user(&self.db, id).await?;

        let name = payload
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(current.name);
        let email = match payload.email.filter(|email| !email.trim().is_empty()) {
            Some(email) => {
                if email != current.email {
                    ensure_email_valid(&email)?;
                    self.ensure_email_free(&email, Some(id)).await?;
                }
                email
            }
            None => current.email,
        };

        match sqlx::query_as::<_, User>(
            "UPDATE users SET name = ?, email = ? WHERE id = ? RETURNING id, name, email",
        )
        .bind(&name)
        .bind(&email)
        .bind(id)
        .fetch_one(&*self.db)
        .await
        {
            Ok(user) => Ok(user),
            Err(err) if is_unique_violation(&err) => Err(ShareError::EmailTaken(email)),
            Err(err) => Err(ShareError::Sqlx(err)),
        }
    }

    /// Remove a user. The schema cascades to their items, bookings and comments.
    pub async fn delete(&self, id: i64) -> ShareResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&*self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ShareError::UserNotFound(id));
        }
        Ok(())
    }

    /// Reject an email already registered to a different user.
    async fn ensure_email_free(&self, email: &str, exclude: Option<i64>) -> ShareResult<()> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT id FROM users WHERE email = ");
        query.push_bind(email);
        if let Some(id) = exclude {
            query.push(" AND id != ");
            query.push_bind(id);
        }

        if query.build().fetch_optional(&*self.db).await?.is_some() {
            return Err(ShareError::EmailTaken(email.to_string()));
        }
        Ok(())
    }
}

/// Minimal structural check for an email address: one `@` with something on
/// both sides, no whitespace anywhere, and a dotted domain ending in an
/// alphabetic top-level label of at least two letters.
fn ensure_email_valid(email: &str) -> ShareResult<()> {
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            let tld_ok = matches!(
                domain.rsplit_once('.'),
                Some((host, tld)) if !host.is_empty()
                    && tld.len() >= 2
                    && tld.chars().all(|c| c.is_ascii_alphabetic())
            );
            !local.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
                && tld_ok
        }
        None => false,
    };

    if well_formed {
        Ok(())
    } else {
        Err(ShareError::Validation(format!(
            "email {email} is not a valid address"
        )))
    }
}

/// Return true if SQLx error indicates a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.message().to_ascii_lowercase().contains("unique")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(pool: SqlitePool) -> UserService {
        UserService::new(Arc::new(pool))
    }

    fn payload(name: &str, email: &str) -> CreateUser {
        CreateUser {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
        }
    }

    #[sqlx::test]
    async fn registers_and_fetches_a_user(pool: SqlitePool) {
        let users = service(pool);

        let created = users.create(payload("Ada", "ada@example.com")).await.unwrap();
        assert!(created.id > 0);

        let fetched = users.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched.name, "Ada");
        assert_eq!(fetched.email, "ada@example.com");
    }

    #[sqlx::test]
    async fn rejects_blank_and_malformed_input(pool: SqlitePool) {
        let users = service(pool);

        let blank_name = users.create(payload("  ", "ada@example.com")).await;
        assert!(matches!(blank_name, Err(ShareError::Validation(_))));

        let no_at = users.create(payload("Ada", "ada.example.com")).await;
        assert!(matches!(no_at, Err(ShareError::Validation(_))));

        let bare_domain = users.create(payload("Ada", "ada@example")).await;
        assert!(matches!(bare_domain, Err(ShareError::Validation(_))));

        let numeric_tld = users.create(payload("Ada", "ada@example.c0m")).await;
        assert!(matches!(numeric_tld, Err(ShareError::Validation(_))));

        let missing_email = users
            .create(CreateUser {
                name: Some("Ada".into()),
                email: None,
            })
            .await;
        assert!(matches!(missing_email, Err(ShareError::Validation(_))));
    }

    #[sqlx::test]
    async fn rejects_duplicate_email(pool: SqlitePool) {
        let users = service(pool);
        users.create(payload("Ada", "ada@example.com")).await.unwrap();

        let duplicate = users.create(payload("Grace", "ada@example.com")).await;
        assert!(matches!(duplicate, Err(ShareError::EmailTaken(_))));
    }

    #[sqlx::test]
    async fn update_keeps_absent_fields(pool: SqlitePool) {
        let users = service(pool);
        let created = users.create(payload("Ada", "ada@example.com")).await.unwrap();

        let updated = users
            .update(
                created.id,
                UpdateUser {
                    name: Some("Ada Lovelace".into()),
                    email: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Ada Lovelace");
        assert_eq!(updated.email, "ada@example.com");
    }

    #[sqlx::test]
    async fn update_rejects_email_taken_by_another_user(pool: SqlitePool) {
        let users = service(pool);
        users.create(payload("Ada", "ada@example.com")).await.unwrap();
        let grace = users.create(payload("Grace", "grace@example.com")).await.unwrap();

        let stolen = users
            .update(
                grace.id,
                UpdateUser {
                    name: None,
                    email: Some("ada@example.com".into()),
                },
            )
            .await;
        assert!(matches!(stolen, Err(ShareError::EmailTaken(_))));

        // Re-submitting the user's own email is not a conflict.
        let unchanged = users
            .update(
                grace.id,
                UpdateUser {
                    name: None,
                    email: Some("grace@example.com".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(unchanged.email, "grace@example.com");
    }

    #[sqlx::test]
    async fn delete_reports_missing_user(pool: SqlitePool) {
        let users = service(pool);

        let missing = users.delete(42).await;
        assert!(matches!(missing, Err(ShareError::UserNotFound(42))));

        let created = users.create(payload("Ada", "ada@example.com")).await.unwrap();
        users.delete(created.id).await.unwrap();
        let gone = users.get_by_id(created.id).await;
        assert!(matches!(gone, Err(ShareError::UserNotFound(_))));
    }
}
