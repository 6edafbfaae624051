//! Coordination services

pub mod directory;
pub mod relay;
pub mod roster;

pub use directory::ConversationDirectory;
pub use relay::MessageRelay;
pub use roster::ConversationRoster;
