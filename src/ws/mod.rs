//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` pushes the events added by each
//! ingestion cycle to clients subscribed to that cycle's tournament.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
