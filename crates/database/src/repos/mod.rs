//! Data access repositories

pub mod conversation_repository;
pub mod message_repository;
pub mod participant_repository;
pub mod user_repository;

pub use conversation_repository::ConversationRepository;
pub use message_repository::MessageRepository;
pub use participant_repository::ParticipantRepository;
pub use user_repository::UserRepository;
