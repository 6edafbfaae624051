//! Domain entities owned by the persistent store

pub mod conversation;
pub mod message;
pub mod user;

pub use conversation::{Conversation, Participant};
pub use message::{ChatMessage, ChatMessageWithSender, HistoryOrder};
pub use user::User;
