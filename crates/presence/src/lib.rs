//! # Parley Presence Crate
//!
//! Tracks which users currently hold a live real-time connection. The
//! registry is the only owner of the ephemeral connection set; connections
//! are added on connect, removed on disconnect, and never persisted.
//!
//! Every event handler reads or mutates this shared state concurrently, so
//! all access goes through a single `RwLock`; lookups take a read guard,
//! add/remove take the write guard.

pub mod registry;

pub use registry::{Connection, PresenceRegistry};
