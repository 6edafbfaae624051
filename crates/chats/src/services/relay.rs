//! Message relay: persists an incoming message and rebuilds the history the
//! transport re-delivers to both parties.

use crate::types::{ChatResult, RelayOutcome};
use parley_database::{HistoryOrder, MessageRepository, ParticipantRepository};
use sqlx::SqlitePool;
use tracing::debug;

/// Service that persists incoming messages and resolves their receiver.
pub struct MessageRelay {
    participants: ParticipantRepository,
    messages: MessageRepository,
}

impl MessageRelay {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            participants: ParticipantRepository::new(pool.clone()),
            messages: MessageRepository::new(pool),
        }
    }

    /// Persist `content` into the conversation and return the receiver's
    /// user id together with the full refreshed history (oldest first).
    ///
    /// The whole history is re-sent on every message rather than a delta;
    /// final client state is the same either way. A conversation with no
    /// other participant yields `receiver_user_id: None` and delivery
    /// degrades to sender-only.
    pub async fn relay(
        &self,
        conversation_id: i64,
        sender_user_id: i64,
        content: &str,
    ) -> ChatResult<RelayOutcome> {
        let receiver = self
            .participants
            .find_other(conversation_id, sender_user_id)
            .await?;
        if receiver.is_none() {
            debug!(conversation_id, "no receiver participant for conversation");
        }

        self.messages
            .create(conversation_id, sender_user_id, content)
            .await?;

        let history = self
            .messages
            .history_with_senders(conversation_id, HistoryOrder::Ascending)
            .await?;

        Ok(RelayOutcome {
            receiver_user_id: receiver.map(|p| p.user_id),
            history,
        })
    }
}
