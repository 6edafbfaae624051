//! Conversation list aggregation and single-conversation history.

use crate::types::{ChatResult, ConversationSummary, UserSummary};
use futures::future::try_join_all;
use parley_database::{
    ChatMessageWithSender, HistoryOrder, MessageRepository, ParticipantRepository, UserRepository,
};
use sqlx::SqlitePool;
use tracing::debug;

/// Read side of the coordination core: per-user conversation summaries and
/// full single-conversation history.
pub struct ConversationRoster {
    participants: ParticipantRepository,
    messages: MessageRepository,
    users: UserRepository,
}

impl ConversationRoster {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            participants: ParticipantRepository::new(pool.clone()),
            messages: MessageRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    /// Build the user's conversation summaries: most recent message plus the
    /// other participant, for every conversation that has at least one
    /// message.
    ///
    /// Per-conversation lookups run concurrently; one failing lookup fails
    /// the whole aggregation (no partial list is returned). The collected
    /// summaries are sorted by last-message recency, newest first, so the
    /// output does not depend on completion order.
    pub async fn list_for_user(&self, user_id: i64) -> ChatResult<Vec<ConversationSummary>> {
        let conversation_ids = self.participants.conversation_ids_for_user(user_id).await?;
        if conversation_ids.is_empty() {
            return Ok(Vec::new());
        }

        let lookups = conversation_ids
            .into_iter()
            .map(|conversation_id| self.summarize(conversation_id, user_id));
        let mut summaries: Vec<ConversationSummary> = try_join_all(lookups)
            .await?
            .into_iter()
            .flatten()
            .collect();

        summaries.sort_by(|a, b| {
            (b.last_message.created_at.as_str(), b.last_message.id)
                .cmp(&(a.last_message.created_at.as_str(), a.last_message.id))
        });

        Ok(summaries)
    }

    /// One conversation's summary, or `None` when it should not appear in
    /// the list: conversations with no messages yet, and conversations
    /// without another participant (a fresh group), are skipped.
    async fn summarize(
        &self,
        conversation_id: i64,
        user_id: i64,
    ) -> ChatResult<Option<ConversationSummary>> {
        let Some(last_message) = self.messages.latest_for_conversation(conversation_id).await?
        else {
            return Ok(None);
        };

        let Some(other) = self.participants.find_other(conversation_id, user_id).await? else {
            debug!(conversation_id, "conversation has no other participant, skipping");
            return Ok(None);
        };
        let Some(other_user) = self.users.find_by_id(other.user_id).await? else {
            debug!(
                conversation_id,
                other_user_id = other.user_id,
                "participant row points at missing user, skipping"
            );
            return Ok(None);
        };

        Ok(Some(ConversationSummary {
            conversation_id,
            other_user: UserSummary {
                id: other_user.id,
                first_name: other_user.first_name,
                last_name: other_user.last_name,
            },
            last_message,
        }))
    }

    /// Full history of one conversation, newest first, sender names joined.
    pub async fn history(&self, conversation_id: i64) -> ChatResult<Vec<ChatMessageWithSender>> {
        let history = self
            .messages
            .history_with_senders(conversation_id, HistoryOrder::Descending)
            .await?;
        Ok(history)
    }
}
