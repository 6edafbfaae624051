//! Shared types for the coordination core

pub mod errors;
pub mod outcomes;

pub use errors::{ChatError, ChatResult};
pub use outcomes::{
    ConversationSummary, RelayOutcome, StartConversationRequest, StartOutcome, UserSummary,
};
