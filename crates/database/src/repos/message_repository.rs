//! Repository for chat message data access operations.

use crate::entities::{ChatMessage, ChatMessageWithSender, HistoryOrder};
use crate::types::DatabaseResult;
use sqlx::{Row, SqlitePool};
use tracing::info;

/// Repository for chat message database operations
#[derive(Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a message to a conversation.
    pub async fn create(
        &self,
        conversation_id: i64,
        sender_id: i64,
        content: &str,
    ) -> DatabaseResult<ChatMessage> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO chat_messages (conversation_id, sender_id, content, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(conversation_id)
        .bind(sender_id)
        .bind(content)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(message_id = id, conversation_id, sender_id, "created chat message");

        Ok(ChatMessage {
            id,
            conversation_id,
            sender_id,
            content: content.to_string(),
            created_at: now,
        })
    }

    /// Full history of a conversation joined with sender names. The id is the
    /// tiebreaker for messages sharing a timestamp.
    pub async fn history_with_senders(
        &self,
        conversation_id: i64,
        order: HistoryOrder,
    ) -> DatabaseResult<Vec<ChatMessageWithSender>> {
        let dir = order.sql();
        let query = format!(
            "SELECT m.id, m.conversation_id, m.sender_id, m.content, m.created_at,
                    u.first_name AS sender_first_name, u.last_name AS sender_last_name
             FROM chat_messages m
             JOIN users u ON u.id = m.sender_id
             WHERE m.conversation_id = ?
             ORDER BY m.created_at {dir}, m.id {dir}"
        );

        let rows = sqlx::query(&query)
            .bind(conversation_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(ChatMessageWithSender {
                    id: row.try_get("id")?,
                    conversation_id: row.try_get("conversation_id")?,
                    sender_id: row.try_get("sender_id")?,
                    content: row.try_get("content")?,
                    created_at: row.try_get("created_at")?,
                    sender_first_name: row.try_get("sender_first_name")?,
                    sender_last_name: row.try_get("sender_last_name")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(Into::into)
    }

    /// The single most recent message of a conversation, if any.
    pub async fn latest_for_conversation(
        &self,
        conversation_id: i64,
    ) -> DatabaseResult<Option<ChatMessage>> {
        let row = sqlx::query(
            "SELECT id, conversation_id, sender_id, content, created_at
             FROM chat_messages WHERE conversation_id = ?
             ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| -> Result<ChatMessage, sqlx::Error> {
            Ok(ChatMessage {
                id: row.try_get("id")?,
                conversation_id: row.try_get("conversation_id")?,
                sender_id: row.try_get("sender_id")?,
                content: row.try_get("content")?,
                created_at: row.try_get("created_at")?,
            })
        })
        .transpose()
        .map_err(Into::into)
    }
}
