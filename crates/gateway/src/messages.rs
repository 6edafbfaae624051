//! Human-readable error texts sent to clients alongside an `ErrorKind`.

pub const SEND_MESSAGE_FAILED: &str = "Your message could not be delivered. Please try again.";
pub const CONVERSATION_LIST_FAILED: &str =
    "Your conversations could not be loaded. Please try again.";
pub const START_CONVERSATION_FAILED: &str =
    "The conversation could not be started. Please try again.";
pub const CHAT_LIST_FAILED: &str =
    "The conversation history could not be loaded. Please try again.";
