//! Operation results exposed by the coordination services.

use parley_database::{ChatMessage, ChatMessageWithSender, Conversation};
use serde::{Deserialize, Serialize};

/// Request to start a conversation, as received from a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartConversationRequest {
    pub is_group_chat: bool,
    /// Target user id (direct conversations).
    pub participant_id: Option<i64>,
    /// Target display name (direct conversations; used for pair naming).
    pub participant_name: Option<String>,
    /// Group name (group conversations).
    pub name: Option<String>,
    /// Group description (group conversations).
    pub description: Option<String>,
}

/// Outcome of a start-conversation request.
///
/// The original behavior collapsed "created", "already exists" and "target
/// user missing" into identical silence; the tagged outcome keeps the
/// no-state-change semantics while letting callers and tests tell them
/// apart.
#[derive(Debug, Clone, PartialEq)]
pub enum StartOutcome {
    /// A new conversation (and its participant rows) was created.
    Created(Conversation),
    /// The pair already had a conversation, under either name spelling.
    /// Nothing was created or re-notified.
    AlreadyExists(Conversation),
    /// The target user does not exist. No state change.
    TargetNotFound,
}

/// Result of relaying one message: who should receive the refreshed history,
/// and the full ascending history itself.
#[derive(Debug, Clone)]
pub struct RelayOutcome {
    /// The other participant's user id, when the conversation has one.
    pub receiver_user_id: Option<i64>,
    /// Complete conversation history, oldest first, sender names joined.
    pub history: Vec<ChatMessageWithSender>,
}

/// The other participant of a conversation, as shown in summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

/// Derived per-conversation view: the other participant plus the most recent
/// message. Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub conversation_id: i64,
    pub other_user: UserSummary,
    pub last_message: ChatMessage,
}
