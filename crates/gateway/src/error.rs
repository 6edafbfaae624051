//! Error types for the transport layer.

use std::time::Duration;
use thiserror::Error;

/// Failures surfaced while dispatching a client event.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("chat operation failed: {0}")]
    Chat(#[from] parley_chats::ChatError),

    #[error("store call timed out after {0:?}")]
    StoreTimeout(Duration),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
