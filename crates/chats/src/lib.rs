//! # Parley Chats Crate
//!
//! The coordination core of the Parley chat backend: starting conversations
//! without duplication, relaying messages, and aggregating per-user
//! conversation summaries. The transport layer (gateway) calls into these
//! services and decides where results are emitted; the services themselves
//! only talk to the persistent store.
//!
//! ## Architecture
//!
//! - **Services**: `ConversationDirectory` (create/dedup),
//!   `MessageRelay` (persist + history rebuild),
//!   `ConversationRoster` (summaries and history reads)
//! - **Types**: operation requests, tagged outcomes, and `ChatError`

pub mod services;
pub mod types;

pub use services::{ConversationDirectory, ConversationRoster, MessageRelay};
pub use types::{
    ChatError, ChatResult, ConversationSummary, RelayOutcome, StartConversationRequest,
    StartOutcome, UserSummary,
};
