//! Repository for user data access operations.

use crate::entities::User;
use crate::types::DatabaseResult;
use sqlx::{Row, SqlitePool};
use tracing::info;

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key. Absent rows are `Ok(None)`, not errors.
    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, first_name, last_name, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| -> Result<User, sqlx::Error> {
            Ok(User {
                id: row.try_get("id")?,
                first_name: row.try_get("first_name")?,
                last_name: row.try_get("last_name")?,
                created_at: row.try_get("created_at")?,
            })
        })
        .transpose()
        .map_err(Into::into)
    }

    /// Create a user row. Used by seeding and tests; the coordination core
    /// itself never writes users.
    pub async fn create(&self, first_name: &str, last_name: &str) -> DatabaseResult<User> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO users (first_name, last_name, created_at) VALUES (?, ?, ?)",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(user_id = id, "created user");

        Ok(User {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            created_at: now,
        })
    }
}
