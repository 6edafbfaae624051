//! Repository for participant data access operations.

use crate::entities::Participant;
use crate::types::DatabaseResult;
use sqlx::{Row, SqlitePool};

/// Repository for participant database operations
#[derive(Clone)]
pub struct ParticipantRepository {
    pool: SqlitePool,
}

impl ParticipantRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The participant of a conversation whose user id differs from the
    /// caller's, the "other side" of a direct conversation.
    pub async fn find_other(
        &self,
        conversation_id: i64,
        user_id: i64,
    ) -> DatabaseResult<Option<Participant>> {
        let row = sqlx::query(
            "SELECT conversation_id, user_id FROM participants
             WHERE conversation_id = ? AND user_id != ? LIMIT 1",
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| -> Result<Participant, sqlx::Error> {
            Ok(Participant {
                conversation_id: row.try_get("conversation_id")?,
                user_id: row.try_get("user_id")?,
            })
        })
        .transpose()
        .map_err(Into::into)
    }

    /// All conversation ids the user participates in, oldest membership first.
    pub async fn conversation_ids_for_user(&self, user_id: i64) -> DatabaseResult<Vec<i64>> {
        let rows = sqlx::query(
            "SELECT conversation_id FROM participants WHERE user_id = ?
             ORDER BY conversation_id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| row.try_get("conversation_id").map_err(Into::into))
            .collect()
    }
}
