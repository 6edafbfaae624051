//! Conversation entity definitions

use serde::{Deserialize, Serialize};

/// A conversation between two users, or a named group.
///
/// For a two-participant conversation the `name` is the canonical pair name
/// (`"requester-target"`); duplicate detection checks both spellings, so the
/// pair is unique regardless of who started it. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub creator_id: i64,
    pub created_at: String,
}

/// Membership record linking a user to a conversation. A join entity with no
/// identity of its own; created in the same transaction as its conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub conversation_id: i64,
    pub user_id: i64,
}
