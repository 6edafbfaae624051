//! Shared state for the transport layer: service handles, the presence
//! registry, and the per-connection outbound channels.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parley_chats::{ConversationDirectory, ConversationRoster, MessageRelay};
use parley_presence::PresenceRegistry;
use sqlx::SqlitePool;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

use crate::events::ServerEvent;

/// Outbound channel capacity per connection. A slow client backs up its own
/// channel only; other connections are unaffected.
const PEER_CHANNEL_CAPACITY: usize = 64;

/// Shared application state handed to every WebSocket session.
#[derive(Clone)]
pub struct GatewayState {
    directory: Arc<ConversationDirectory>,
    relay: Arc<MessageRelay>,
    roster: Arc<ConversationRoster>,
    presence: PresenceRegistry,
    peers: Arc<RwLock<HashMap<String, mpsc::Sender<ServerEvent>>>>,
    store_timeout: Duration,
}

impl GatewayState {
    pub fn new(pool: SqlitePool, store_timeout: Duration) -> Self {
        Self {
            directory: Arc::new(ConversationDirectory::new(pool.clone())),
            relay: Arc::new(MessageRelay::new(pool.clone())),
            roster: Arc::new(ConversationRoster::new(pool)),
            presence: PresenceRegistry::default(),
            peers: Arc::new(RwLock::new(HashMap::new())),
            store_timeout,
        }
    }

    pub fn presence(&self) -> &PresenceRegistry {
        &self.presence
    }

    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }

    pub(crate) fn directory(&self) -> &ConversationDirectory {
        &self.directory
    }

    pub(crate) fn relay(&self) -> &MessageRelay {
        &self.relay
    }

    pub(crate) fn roster(&self) -> &ConversationRoster {
        &self.roster
    }

    /// Register the outbound channel of a new connection and return its
    /// receiving half to the session loop.
    pub async fn register_peer(&self, connection_id: &str) -> mpsc::Receiver<ServerEvent> {
        let (tx, rx) = mpsc::channel(PEER_CHANNEL_CAPACITY);
        let mut peers = self.peers.write().await;
        peers.insert(connection_id.to_string(), tx);
        rx
    }

    /// Drop a connection's outbound channel. Idempotent.
    pub async fn unregister_peer(&self, connection_id: &str) {
        let mut peers = self.peers.write().await;
        peers.remove(connection_id);
    }

    /// Deliver an event to one connection. A missing or already-closed peer
    /// is a no-op; the presence registry and peer map converge on the next
    /// disconnect sweep.
    pub async fn emit_to(&self, connection_id: &str, event: ServerEvent) {
        let peer = {
            let peers = self.peers.read().await;
            peers.get(connection_id).cloned()
        };
        let Some(peer) = peer else {
            debug!(connection_id, "dropping event for unknown connection");
            return;
        };
        if peer.send(event).await.is_err() {
            debug!(connection_id, "dropping event for closed connection");
        }
    }

    pub async fn peer_count(&self) -> usize {
        self.peers.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_config::DatabaseConfig;

    async fn test_state() -> GatewayState {
        let pool = parley_database::initialize_database(&DatabaseConfig {
            url: "sqlite://:memory:".to_string(),
            max_connections: 1,
        })
        .await
        .unwrap();
        GatewayState::new(pool, Duration::from_secs(10))
    }

    #[tokio::test]
    async fn registered_peer_receives_emitted_events() {
        let state = test_state().await;
        let mut rx = state.register_peer("conn-1").await;

        state.emit_to("conn-1", ServerEvent::Pong).await;
        assert_eq!(rx.recv().await, Some(ServerEvent::Pong));
    }

    #[tokio::test]
    async fn emit_to_unknown_connection_is_a_noop() {
        let state = test_state().await;
        state.emit_to("ghost", ServerEvent::Pong).await;
        assert_eq!(state.peer_count().await, 0);
    }

    #[tokio::test]
    async fn unregister_is_idempotent() {
        let state = test_state().await;
        let _rx = state.register_peer("conn-1").await;

        state.unregister_peer("conn-1").await;
        state.unregister_peer("conn-1").await;
        assert_eq!(state.peer_count().await, 0);
    }
}
