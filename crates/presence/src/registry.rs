//! Connection registry keyed by connection id and by user id.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// A live real-time session bound to one authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Transport-assigned connection id.
    pub id: String,
    /// The user this connection belongs to.
    pub user_id: i64,
    /// Display name presented at connect time; used for pair naming.
    pub user_name: String,
}

#[derive(Default)]
struct Indexes {
    by_connection: HashMap<String, Connection>,
    by_user: HashMap<i64, String>,
}

/// Shared, concurrency-safe registry of live connections.
///
/// Cloning the registry clones a handle to the same underlying state. At
/// most one active connection per user is modeled; adding a connection for
/// an already-present user replaces the previous one.
#[derive(Clone, Default)]
pub struct PresenceRegistry {
    inner: Arc<RwLock<Indexes>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a connection. Idempotent per connection id: re-adding replaces
    /// the stored record. Both indexes are repaired so neither a replaced
    /// connection nor a user's previous connection leaves a stale entry.
    pub async fn add(&self, connection: Connection) {
        let mut indexes = self.inner.write().await;

        if let Some(previous) = indexes.by_user.insert(connection.user_id, connection.id.clone())
        {
            if previous != connection.id {
                indexes.by_connection.remove(&previous);
            }
        }
        if let Some(replaced) = indexes
            .by_connection
            .insert(connection.id.clone(), connection.clone())
        {
            if replaced.user_id != connection.user_id {
                indexes.by_user.remove(&replaced.user_id);
            }
        }

        debug!(
            connection_id = %connection.id,
            user_id = connection.user_id,
            online = indexes.by_connection.len(),
            "connection registered"
        );
    }

    /// Remove a connection by id. Unknown ids are a no-op, never an error;
    /// duplicate or late disconnect events must be harmless.
    pub async fn remove(&self, connection_id: &str) -> Option<Connection> {
        let mut indexes = self.inner.write().await;

        let removed = indexes.by_connection.remove(connection_id)?;
        // Only drop the user index entry if it still points at this
        // connection; the user may have reconnected already.
        if indexes.by_user.get(&removed.user_id).map(String::as_str) == Some(connection_id) {
            indexes.by_user.remove(&removed.user_id);
        }

        debug!(
            connection_id,
            user_id = removed.user_id,
            online = indexes.by_connection.len(),
            "connection removed"
        );
        Some(removed)
    }

    /// Resolve the caller behind a connection id.
    pub async fn find_by_connection_id(&self, connection_id: &str) -> Option<Connection> {
        self.inner
            .read()
            .await
            .by_connection
            .get(connection_id)
            .cloned()
    }

    /// Resolve whether (and where) a user is online.
    pub async fn find_by_user_id(&self, user_id: i64) -> Option<Connection> {
        let indexes = self.inner.read().await;
        let connection_id = indexes.by_user.get(&user_id)?;
        indexes.by_connection.get(connection_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.by_connection.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.by_connection.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection(id: &str, user_id: i64, name: &str) -> Connection {
        Connection {
            id: id.to_string(),
            user_id,
            user_name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn add_and_lookup_by_both_keys() {
        let registry = PresenceRegistry::new();
        registry.add(connection("c1", 7, "ada")).await;

        let by_conn = registry.find_by_connection_id("c1").await.unwrap();
        assert_eq!(by_conn.user_id, 7);

        let by_user = registry.find_by_user_id(7).await.unwrap();
        assert_eq!(by_user.id, "c1");
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let registry = PresenceRegistry::new();
        registry.add(connection("c1", 7, "ada")).await;

        assert!(registry.remove("c1").await.is_some());
        assert!(registry.remove("c1").await.is_none());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn unknown_connection_remove_is_a_noop() {
        let registry = PresenceRegistry::new();
        assert!(registry.remove("ghost").await.is_none());
    }

    #[tokio::test]
    async fn readding_a_connection_replaces_it() {
        let registry = PresenceRegistry::new();
        registry.add(connection("c1", 7, "ada")).await;
        registry.add(connection("c1", 7, "ada-renamed")).await;

        assert_eq!(registry.len().await, 1);
        let stored = registry.find_by_connection_id("c1").await.unwrap();
        assert_eq!(stored.user_name, "ada-renamed");
    }

    #[tokio::test]
    async fn reconnect_replaces_previous_user_connection() {
        let registry = PresenceRegistry::new();
        registry.add(connection("c1", 7, "ada")).await;
        registry.add(connection("c2", 7, "ada")).await;

        // The old connection no longer resolves, and the user index points
        // at the new one.
        assert!(registry.find_by_connection_id("c1").await.is_none());
        assert_eq!(registry.find_by_user_id(7).await.unwrap().id, "c2");
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn removing_stale_connection_keeps_reconnected_user_online() {
        let registry = PresenceRegistry::new();
        registry.add(connection("c1", 7, "ada")).await;
        registry.add(connection("c2", 7, "ada")).await;

        // Late disconnect for the replaced connection must not knock the
        // user's current connection out of the user index.
        registry.remove("c1").await;
        assert_eq!(registry.find_by_user_id(7).await.unwrap().id, "c2");
    }

    #[tokio::test]
    async fn offline_user_is_not_found() {
        let registry = PresenceRegistry::new();
        registry.add(connection("c1", 7, "ada")).await;
        assert!(registry.find_by_user_id(8).await.is_none());
    }
}
