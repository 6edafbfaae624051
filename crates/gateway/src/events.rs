//! Wire events exchanged with WebSocket clients.
//!
//! Both directions use internally tagged JSON (`"type"` field, snake_case
//! variant names). Payload field names are part of the client contract and
//! must not change casually.

use parley_database::ChatMessageWithSender;
use serde::{Deserialize, Serialize};

/// Events received from a connected client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Heartbeat to keep the connection alive.
    Ping,
    /// Persist a message and redistribute the conversation history.
    SendMessage {
        conversation_id: i64,
        message: String,
    },
    /// Request the caller's conversation summaries.
    GetConversationList,
    /// Start (or re-find) a conversation.
    StartConversation {
        is_group_chat: bool,
        conversation_participant_id: Option<i64>,
        conversation_participant_name: Option<String>,
        conversation_name: Option<String>,
        conversation_description: Option<String>,
    },
    /// Request one conversation's full history.
    GetChatList { conversation_id: i64 },
}

/// Events emitted to a connected client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Sent once after a successful upgrade.
    Hello { connection_id: String },
    /// Heartbeat response.
    Pong,
    /// Refreshed full history of a conversation after a message was relayed.
    /// The `chat` payload field name is part of the client contract.
    ChatList { chat: Vec<ChatMessageWithSender> },
    /// The caller's conversation summaries.
    ConversationList {
        conversation_list: Vec<parley_chats::ConversationSummary>,
    },
    /// One conversation's history, newest first.
    SingleConversationChat { chats: Vec<ChatMessageWithSender> },
    /// Confirmation of a start-conversation request.
    ConversationStarted {
        status: StartStatus,
        conversation_id: Option<i64>,
    },
    /// Operation failure visible to the client.
    Error { message: String, kind: ErrorKind },
}

/// Outcome tag carried by `conversation_started`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartStatus {
    Created,
    AlreadyExists,
    TargetNotFound,
}

/// Client-visible error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    SendMessageError,
    /// Reserved wire value for disconnect failures. Session teardown is
    /// in-process and infallible here, so no server path emits it; clients
    /// handling the historical protocol still recognize it.
    DisconnectionError,
    ConversationListError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_events_decode_from_tagged_json() {
        let event: ClientEvent = serde_json::from_value(json!({
            "type": "send_message",
            "conversation_id": 7,
            "message": "hello there"
        }))
        .unwrap();
        assert!(matches!(
            event,
            ClientEvent::SendMessage { conversation_id: 7, ref message } if message == "hello there"
        ));

        let event: ClientEvent = serde_json::from_value(json!({"type": "ping"})).unwrap();
        assert!(matches!(event, ClientEvent::Ping));

        let event: ClientEvent = serde_json::from_value(json!({
            "type": "start_conversation",
            "is_group_chat": false,
            "conversation_participant_id": 3,
            "conversation_participant_name": "Maria",
            "conversation_name": null,
            "conversation_description": null
        }))
        .unwrap();
        assert!(matches!(
            event,
            ClientEvent::StartConversation { is_group_chat: false, conversation_participant_id: Some(3), .. }
        ));
    }

    #[test]
    fn unknown_client_event_is_rejected() {
        let result = serde_json::from_value::<ClientEvent>(json!({"type": "self_destruct"}));
        assert!(result.is_err());
    }

    #[test]
    fn error_event_serializes_with_screaming_kind() {
        let event = ServerEvent::Error {
            message: "boom".to_string(),
            kind: ErrorKind::SendMessageError,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"type": "error", "message": "boom", "kind": "SEND_MESSAGE_ERROR"})
        );

        let value = serde_json::to_value(ErrorKind::DisconnectionError).unwrap();
        assert_eq!(value, json!("DISCONNECTION_ERROR"));
        let value = serde_json::to_value(ErrorKind::ConversationListError).unwrap();
        assert_eq!(value, json!("CONVERSATION_LIST_ERROR"));
    }

    #[test]
    fn conversation_started_serializes_status_tag() {
        let event = ServerEvent::ConversationStarted {
            status: StartStatus::AlreadyExists,
            conversation_id: Some(12),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "conversation_started",
                "status": "already_exists",
                "conversation_id": 12
            })
        );
    }

    #[test]
    fn hello_and_pong_round_trip() {
        let hello = ServerEvent::Hello {
            connection_id: "c1".to_string(),
        };
        let text = serde_json::to_string(&hello).unwrap();
        assert_eq!(serde_json::from_str::<ServerEvent>(&text).unwrap(), hello);

        let value = serde_json::to_value(ServerEvent::Pong).unwrap();
        assert_eq!(value, json!({"type": "pong"}));
    }
}
