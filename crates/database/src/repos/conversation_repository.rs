//! Repository for conversation data access operations.

use crate::entities::Conversation;
use crate::types::DatabaseResult;
use sqlx::{Row, SqlitePool};
use tracing::info;

/// Repository for conversation database operations
#[derive(Clone)]
pub struct ConversationRepository {
    pool: SqlitePool,
}

impl ConversationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Look up a conversation by pair name, checking both spellings of the
    /// pair so `"A-B"` and `"B-A"` resolve to the same row.
    pub async fn find_by_pair_name(
        &self,
        name: &str,
        reversed: &str,
    ) -> DatabaseResult<Option<Conversation>> {
        let row = sqlx::query(
            "SELECT id, name, description, creator_id, created_at
             FROM conversations WHERE name = ? OR name = ? LIMIT 1",
        )
        .bind(name)
        .bind(reversed)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_conversation).transpose()
    }

    /// Create a direct conversation together with both participant rows.
    ///
    /// The conversation insert and the two participant inserts commit as one
    /// transaction; a direct conversation never exists without its pair.
    pub async fn create_direct(
        &self,
        name: &str,
        creator_id: i64,
        target_id: i64,
    ) -> DatabaseResult<Conversation> {
        let now = chrono::Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO conversations (name, description, creator_id, created_at)
             VALUES (?, '', ?, ?)",
        )
        .bind(name)
        .bind(creator_id)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        let conversation_id = result.last_insert_rowid();

        for user_id in [creator_id, target_id] {
            sqlx::query(
                "INSERT INTO participants (conversation_id, user_id, created_at)
                 VALUES (?, ?, ?)",
            )
            .bind(conversation_id)
            .bind(user_id)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            conversation_id,
            creator_id, target_id, "created direct conversation"
        );

        Ok(Conversation {
            id: conversation_id,
            name: name.to_string(),
            description: String::new(),
            creator_id,
            created_at: now,
        })
    }

    /// Create a group conversation with the creator as its initial
    /// participant, in one transaction.
    pub async fn create_group(
        &self,
        name: &str,
        description: &str,
        creator_id: i64,
    ) -> DatabaseResult<Conversation> {
        let now = chrono::Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO conversations (name, description, creator_id, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(description)
        .bind(creator_id)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        let conversation_id = result.last_insert_rowid();

        sqlx::query(
            "INSERT INTO participants (conversation_id, user_id, created_at)
             VALUES (?, ?, ?)",
        )
        .bind(conversation_id)
        .bind(creator_id)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(conversation_id, creator_id, "created group conversation");

        Ok(Conversation {
            id: conversation_id,
            name: name.to_string(),
            description: description.to_string(),
            creator_id,
            created_at: now,
        })
    }

    fn row_to_conversation(row: sqlx::sqlite::SqliteRow) -> DatabaseResult<Conversation> {
        Ok(Conversation {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            creator_id: row.try_get("creator_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
