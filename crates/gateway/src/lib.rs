//! # Parley Gateway Crate
//!
//! WebSocket transport layer of the Parley chat backend. It owns the wire
//! event types, the per-connection outbound channels, and the dispatcher
//! that routes client events into the coordination services. Delivery to
//! other users is presence-gated: an event for an offline user is dropped,
//! never queued.
//!
//! ## Architecture
//!
//! - **Events**: internally tagged `ClientEvent` / `ServerEvent` wire enums
//! - **State**: `GatewayState` with service handles, presence registry, and
//!   the peer map
//! - **WebSocket**: session lifecycle and the per-event dispatcher

pub mod error;
pub mod events;
pub mod messages;
pub mod state;
pub mod websocket;

pub use error::{GatewayError, GatewayResult};
pub use events::{ClientEvent, ErrorKind, ServerEvent, StartStatus};
pub use state::GatewayState;

use axum::{http::Method, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router: the WebSocket endpoint plus a permissive
/// CORS layer for browser clients.
pub fn create_router(state: GatewayState) -> Router {
    Router::new()
        .route("/ws", get(websocket::websocket_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(Any),
        )
        .with_state(state)
}
