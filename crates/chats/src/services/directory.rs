//! Conversation directory: creates conversations and their participants,
//! deduplicating 1:1 pairs.

use crate::types::{ChatError, ChatResult, StartConversationRequest, StartOutcome};
use parley_database::{ConversationRepository, UserRepository};
use sqlx::SqlitePool;
use tracing::debug;

/// Service that starts direct and group conversations.
pub struct ConversationDirectory {
    conversations: ConversationRepository,
    users: UserRepository,
}

impl ConversationDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            conversations: ConversationRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    /// Start a conversation on behalf of `requester_id`/`requester_name`.
    ///
    /// Direct path: the (requester, target) pair is unique regardless of
    /// name ordering: `"A-B"` and `"B-A"` resolve to the same conversation,
    /// and starting an existing one changes nothing. Group path: always
    /// creates, with the creator as the initial participant.
    pub async fn start_conversation(
        &self,
        requester_id: i64,
        requester_name: &str,
        request: &StartConversationRequest,
    ) -> ChatResult<StartOutcome> {
        if request.is_group_chat {
            self.start_group(requester_id, request).await
        } else {
            self.start_direct(requester_id, requester_name, request).await
        }
    }

    async fn start_direct(
        &self,
        requester_id: i64,
        requester_name: &str,
        request: &StartConversationRequest,
    ) -> ChatResult<StartOutcome> {
        let target_id = request.participant_id.ok_or_else(|| {
            ChatError::validation("direct conversation requires a participant id")
        })?;
        let target_name = request.participant_name.as_deref().ok_or_else(|| {
            ChatError::validation("direct conversation requires a participant name")
        })?;

        if self.users.find_by_id(target_id).await?.is_none() {
            debug!(target_id, "start-conversation target does not exist");
            return Ok(StartOutcome::TargetNotFound);
        }

        let pair_name = format!("{requester_name}-{target_name}");
        let reversed = format!("{target_name}-{requester_name}");

        if let Some(existing) = self
            .conversations
            .find_by_pair_name(&pair_name, &reversed)
            .await?
        {
            debug!(conversation_id = existing.id, "conversation pair already exists");
            return Ok(StartOutcome::AlreadyExists(existing));
        }

        let conversation = self
            .conversations
            .create_direct(&pair_name, requester_id, target_id)
            .await?;

        Ok(StartOutcome::Created(conversation))
    }

    async fn start_group(
        &self,
        requester_id: i64,
        request: &StartConversationRequest,
    ) -> ChatResult<StartOutcome> {
        let name = request
            .name
            .as_deref()
            .ok_or_else(|| ChatError::validation("group conversation requires a name"))?;
        let description = request.description.as_deref().unwrap_or("");

        let conversation = self
            .conversations
            .create_group(name, description, requester_id)
            .await?;

        Ok(StartOutcome::Created(conversation))
    }
}
