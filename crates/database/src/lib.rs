//! # Parley Database Crate
//!
//! The persistent store for the Parley chat backend: connection management,
//! embedded migrations, domain entities, and the repositories the
//! coordination core calls (users, conversations, participants, chat
//! messages).

use parley_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::run_migrations;

pub use entities::{
    ChatMessage, ChatMessageWithSender, Conversation, HistoryOrder, Participant, User,
};
pub use repos::{
    ConversationRepository, MessageRepository, ParticipantRepository, UserRepository,
};
pub use types::{errors::DatabaseError, DatabaseResult};

/// Initialize the database: connect and apply migrations.
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

    Ok(pool)
}

/// In-memory pool with migrations applied, for unit tests.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let config = DatabaseConfig {
        url: "sqlite://:memory:".to_string(),
        max_connections: 1,
    };
    initialize_database(&config)
        .await
        .expect("test database should initialize")
}
