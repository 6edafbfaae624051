//! WebSocket session lifecycle: upgrade, hello, select loop, teardown.

mod dispatcher;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use parley_presence::Connection;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::events::{ClientEvent, ServerEvent};
use crate::state::GatewayState;

/// Identity presented on connect. There is no authentication layer; the
/// query parameters are taken at face value.
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub user_id: i64,
    pub user_name: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<GatewayState>,
    Query(query): Query<ConnectQuery>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, query))
}

async fn handle_socket(socket: WebSocket, state: GatewayState, query: ConnectQuery) {
    let connection_id = cuid2::create_id();
    let mut out_rx = state.register_peer(&connection_id).await;
    state
        .presence()
        .add(Connection {
            id: connection_id.clone(),
            user_id: query.user_id,
            user_name: query.user_name.clone(),
        })
        .await;
    info!(%connection_id, user_id = query.user_id, "websocket connected");

    state
        .emit_to(
            &connection_id,
            ServerEvent::Hello {
                connection_id: connection_id.clone(),
            },
        )
        .await;

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            outgoing = out_rx.recv() => {
                let Some(event) = outgoing else { break };
                match serde_json::to_string(&event) {
                    Ok(text) => {
                        if sink.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => warn!(error = %err, "failed to encode server event"),
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientEvent>(&text) {
                            Ok(event) => {
                                dispatcher::handle_client_event(
                                    event,
                                    &state,
                                    &connection_id,
                                    query.user_id,
                                    &query.user_name,
                                )
                                .await;
                            }
                            Err(err) => {
                                debug!(error = %err, "ignoring malformed client event");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        debug!(error = %err, %connection_id, "websocket receive error");
                        break;
                    }
                }
            }
        }
    }

    state.unregister_peer(&connection_id).await;
    if state.presence().remove(&connection_id).await.is_none() {
        debug!(%connection_id, "presence entry already removed at teardown");
    }
    info!(%connection_id, user_id = query.user_id, "websocket disconnected");
}
