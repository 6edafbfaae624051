//! Chat message entity definitions

use serde::{Deserialize, Serialize};

/// A persisted chat message. Append-only; history for a conversation is
/// totally ordered by `(created_at, id)`; the autoincrement id breaks ties
/// between messages persisted in the same instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub created_at: String,
}

/// A chat message joined with its sender's display name, as delivered to
/// clients in chat-list payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageWithSender {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub created_at: String,
    pub sender_first_name: String,
    pub sender_last_name: String,
}

/// Sort direction for history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOrder {
    /// Oldest first, used when re-sending the full history after a relay.
    Ascending,
    /// Newest first, used for single-conversation chat-list requests.
    Descending,
}

impl HistoryOrder {
    pub(crate) fn sql(self) -> &'static str {
        match self {
            HistoryOrder::Ascending => "ASC",
            HistoryOrder::Descending => "DESC",
        }
    }
}
