//! Client event dispatch: one handler per inbound event, each service call
//! bounded by the configured store timeout.

use std::future::Future;

use parley_chats::{ChatResult, StartConversationRequest, StartOutcome};
use tracing::{error, warn};

use crate::error::{GatewayError, GatewayResult};
use crate::events::{ClientEvent, ErrorKind, ServerEvent, StartStatus};
use crate::messages;
use crate::state::GatewayState;

pub(crate) async fn handle_client_event(
    event: ClientEvent,
    state: &GatewayState,
    connection_id: &str,
    user_id: i64,
    user_name: &str,
) {
    match event {
        ClientEvent::Ping => {
            state.emit_to(connection_id, ServerEvent::Pong).await;
        }
        ClientEvent::SendMessage {
            conversation_id,
            message,
        } => {
            handle_send_message(state, connection_id, user_id, conversation_id, &message).await;
        }
        ClientEvent::GetConversationList => {
            handle_get_conversation_list(state, connection_id, user_id).await;
        }
        ClientEvent::StartConversation {
            is_group_chat,
            conversation_participant_id,
            conversation_participant_name,
            conversation_name,
            conversation_description,
        } => {
            let request = StartConversationRequest {
                is_group_chat,
                participant_id: conversation_participant_id,
                participant_name: conversation_participant_name,
                name: conversation_name,
                description: conversation_description,
            };
            handle_start_conversation(state, connection_id, user_id, user_name, request).await;
        }
        ClientEvent::GetChatList { conversation_id } => {
            handle_get_chat_list(state, connection_id, conversation_id).await;
        }
    }
}

/// Run a store-backed service call under the configured timeout.
async fn bounded<T, F>(state: &GatewayState, call: F) -> GatewayResult<T>
where
    F: Future<Output = ChatResult<T>>,
{
    match tokio::time::timeout(state.store_timeout(), call).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(GatewayError::StoreTimeout(state.store_timeout())),
    }
}

async fn emit_error(state: &GatewayState, connection_id: &str, message: &str, kind: ErrorKind) {
    state
        .emit_to(
            connection_id,
            ServerEvent::Error {
                message: message.to_string(),
                kind,
            },
        )
        .await;
}

async fn handle_send_message(
    state: &GatewayState,
    connection_id: &str,
    user_id: i64,
    conversation_id: i64,
    message: &str,
) {
    match bounded(state, state.relay().relay(conversation_id, user_id, message)).await {
        Ok(outcome) => {
            // The receiver only gets the refreshed history while online.
            if let Some(receiver_user_id) = outcome.receiver_user_id {
                if let Some(receiver) = state.presence().find_by_user_id(receiver_user_id).await {
                    state
                        .emit_to(
                            &receiver.id,
                            ServerEvent::ChatList {
                                chat: outcome.history.clone(),
                            },
                        )
                        .await;
                }
            }
            state
                .emit_to(
                    connection_id,
                    ServerEvent::ChatList {
                        chat: outcome.history,
                    },
                )
                .await;
        }
        Err(err) => {
            error!(error = %err, conversation_id, user_id, "message relay failed");
            emit_error(
                state,
                connection_id,
                messages::SEND_MESSAGE_FAILED,
                ErrorKind::SendMessageError,
            )
            .await;
        }
    }
}

async fn handle_get_conversation_list(state: &GatewayState, connection_id: &str, user_id: i64) {
    match bounded(state, state.roster().list_for_user(user_id)).await {
        Ok(conversation_list) => {
            state
                .emit_to(
                    connection_id,
                    ServerEvent::ConversationList { conversation_list },
                )
                .await;
        }
        Err(err) => {
            error!(error = %err, user_id, "conversation list aggregation failed");
            emit_error(
                state,
                connection_id,
                messages::CONVERSATION_LIST_FAILED,
                ErrorKind::ConversationListError,
            )
            .await;
        }
    }
}

async fn handle_start_conversation(
    state: &GatewayState,
    connection_id: &str,
    user_id: i64,
    user_name: &str,
    request: StartConversationRequest,
) {
    match bounded(
        state,
        state.directory().start_conversation(user_id, user_name, &request),
    )
    .await
    {
        Ok(outcome) => {
            let (status, conversation_id) = match outcome {
                StartOutcome::Created(conversation) => {
                    (StartStatus::Created, Some(conversation.id))
                }
                StartOutcome::AlreadyExists(conversation) => {
                    (StartStatus::AlreadyExists, Some(conversation.id))
                }
                StartOutcome::TargetNotFound => {
                    warn!(user_id, "start conversation target does not exist");
                    (StartStatus::TargetNotFound, None)
                }
            };
            state
                .emit_to(
                    connection_id,
                    ServerEvent::ConversationStarted {
                        status,
                        conversation_id,
                    },
                )
                .await;
        }
        Err(err) => {
            error!(error = %err, user_id, "start conversation failed");
            emit_error(
                state,
                connection_id,
                messages::START_CONVERSATION_FAILED,
                ErrorKind::ConversationListError,
            )
            .await;
        }
    }
}

async fn handle_get_chat_list(state: &GatewayState, connection_id: &str, conversation_id: i64) {
    match bounded(state, state.roster().history(conversation_id)).await {
        Ok(chats) => {
            state
                .emit_to(connection_id, ServerEvent::SingleConversationChat { chats })
                .await;
        }
        Err(err) => {
            error!(error = %err, conversation_id, "chat history lookup failed");
            emit_error(
                state,
                connection_id,
                messages::CHAT_LIST_FAILED,
                ErrorKind::ConversationListError,
            )
            .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_config::DatabaseConfig;
    use parley_database::UserRepository;
    use parley_presence::Connection;
    use std::time::Duration;

    async fn test_state() -> (GatewayState, sqlx::SqlitePool) {
        let pool = parley_database::initialize_database(&DatabaseConfig {
            url: "sqlite://:memory:".to_string(),
            max_connections: 1,
        })
        .await
        .unwrap();
        (GatewayState::new(pool.clone(), Duration::from_secs(10)), pool)
    }

    async fn connect(
        state: &GatewayState,
        connection_id: &str,
        user_id: i64,
        user_name: &str,
    ) -> tokio::sync::mpsc::Receiver<ServerEvent> {
        let rx = state.register_peer(connection_id).await;
        state
            .presence()
            .add(Connection {
                id: connection_id.to_string(),
                user_id,
                user_name: user_name.to_string(),
            })
            .await;
        rx
    }

    #[tokio::test]
    async fn ping_answers_pong() {
        let (state, _pool) = test_state().await;
        let mut rx = connect(&state, "c1", 1, "Ada").await;

        handle_client_event(ClientEvent::Ping, &state, "c1", 1, "Ada").await;
        assert_eq!(rx.recv().await, Some(ServerEvent::Pong));
    }

    #[tokio::test]
    async fn send_message_reaches_sender_and_online_receiver() {
        let (state, pool) = test_state().await;
        let users = UserRepository::new(pool);
        let ada = users.create("Ada", "Lovelace").await.unwrap();
        let blaise = users.create("Blaise", "Pascal").await.unwrap();

        let mut ada_rx = connect(&state, "c-ada", ada.id, &ada.first_name).await;
        let mut blaise_rx = connect(&state, "c-blaise", blaise.id, &blaise.first_name).await;

        handle_client_event(
            ClientEvent::StartConversation {
                is_group_chat: false,
                conversation_participant_id: Some(blaise.id),
                conversation_participant_name: Some(blaise.first_name.clone()),
                conversation_name: None,
                conversation_description: None,
            },
            &state,
            "c-ada",
            ada.id,
            &ada.first_name,
        )
        .await;
        let Some(ServerEvent::ConversationStarted {
            status: StartStatus::Created,
            conversation_id: Some(conversation_id),
        }) = ada_rx.recv().await
        else {
            panic!("expected conversation_started");
        };

        handle_client_event(
            ClientEvent::SendMessage {
                conversation_id,
                message: "hello".to_string(),
            },
            &state,
            "c-ada",
            ada.id,
            &ada.first_name,
        )
        .await;

        let Some(ServerEvent::ChatList { chat }) = ada_rx.recv().await else {
            panic!("sender should receive the refreshed history");
        };
        assert_eq!(chat.len(), 1);
        assert_eq!(chat[0].content, "hello");

        let Some(ServerEvent::ChatList { chat }) = blaise_rx.recv().await else {
            panic!("online receiver should receive the refreshed history");
        };
        assert_eq!(chat.len(), 1);
    }

    #[tokio::test]
    async fn offline_receiver_is_skipped_without_error() {
        let (state, pool) = test_state().await;
        let users = UserRepository::new(pool);
        let ada = users.create("Ada", "Lovelace").await.unwrap();
        let blaise = users.create("Blaise", "Pascal").await.unwrap();

        let mut ada_rx = connect(&state, "c-ada", ada.id, &ada.first_name).await;

        handle_client_event(
            ClientEvent::StartConversation {
                is_group_chat: false,
                conversation_participant_id: Some(blaise.id),
                conversation_participant_name: Some(blaise.first_name.clone()),
                conversation_name: None,
                conversation_description: None,
            },
            &state,
            "c-ada",
            ada.id,
            &ada.first_name,
        )
        .await;
        let Some(ServerEvent::ConversationStarted {
            conversation_id: Some(conversation_id),
            ..
        }) = ada_rx.recv().await
        else {
            panic!("expected conversation_started");
        };

        handle_client_event(
            ClientEvent::SendMessage {
                conversation_id,
                message: "hello".to_string(),
            },
            &state,
            "c-ada",
            ada.id,
            &ada.first_name,
        )
        .await;

        // Only the sender copy arrives; no error event for the offline peer.
        let Some(ServerEvent::ChatList { chat }) = ada_rx.recv().await else {
            panic!("sender should still receive the history");
        };
        assert_eq!(chat.len(), 1);
        assert!(ada_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn start_conversation_with_missing_target_reports_not_found() {
        let (state, pool) = test_state().await;
        let users = UserRepository::new(pool);
        let ada = users.create("Ada", "Lovelace").await.unwrap();
        let mut rx = connect(&state, "c1", ada.id, &ada.first_name).await;

        handle_client_event(
            ClientEvent::StartConversation {
                is_group_chat: false,
                conversation_participant_id: Some(999),
                conversation_participant_name: Some("Nobody".to_string()),
                conversation_name: None,
                conversation_description: None,
            },
            &state,
            "c1",
            ada.id,
            &ada.first_name,
        )
        .await;

        assert_eq!(
            rx.recv().await,
            Some(ServerEvent::ConversationStarted {
                status: StartStatus::TargetNotFound,
                conversation_id: None,
            })
        );
    }

    #[tokio::test]
    async fn invalid_start_request_emits_error_event() {
        let (state, pool) = test_state().await;
        let users = UserRepository::new(pool);
        let ada = users.create("Ada", "Lovelace").await.unwrap();
        let mut rx = connect(&state, "c1", ada.id, &ada.first_name).await;

        // Direct conversation without a target id is a validation failure.
        handle_client_event(
            ClientEvent::StartConversation {
                is_group_chat: false,
                conversation_participant_id: None,
                conversation_participant_name: None,
                conversation_name: None,
                conversation_description: None,
            },
            &state,
            "c1",
            ada.id,
            &ada.first_name,
        )
        .await;

        let Some(ServerEvent::Error { kind, .. }) = rx.recv().await else {
            panic!("expected an error event");
        };
        assert_eq!(kind, ErrorKind::ConversationListError);
    }

    #[tokio::test]
    async fn get_conversation_list_and_chat_list_answer_on_empty_state() {
        let (state, pool) = test_state().await;
        let users = UserRepository::new(pool);
        let ada = users.create("Ada", "Lovelace").await.unwrap();
        let mut rx = connect(&state, "c1", ada.id, &ada.first_name).await;

        handle_client_event(
            ClientEvent::GetConversationList,
            &state,
            "c1",
            ada.id,
            &ada.first_name,
        )
        .await;
        assert_eq!(
            rx.recv().await,
            Some(ServerEvent::ConversationList {
                conversation_list: Vec::new()
            })
        );

        handle_client_event(
            ClientEvent::GetChatList { conversation_id: 7 },
            &state,
            "c1",
            ada.id,
            &ada.first_name,
        )
        .await;
        assert_eq!(
            rx.recv().await,
            Some(ServerEvent::SingleConversationChat { chats: Vec::new() })
        );
    }
}
