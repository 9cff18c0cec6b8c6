//! Broadcast channel for feed updates.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. Every ingestion
//! cycle that persists new events publishes a [`FeedUpdate`] through the bus,
//! and all WebSocket connections subscribe to receive filtered updates.

use serde::Serialize;
use tokio::sync::broadcast;

use super::{DataSource, FeedEvent};

/// Events added to a tournament's stored data by one ingestion cycle.
#[derive(Debug, Clone, Serialize)]
pub struct FeedUpdate {
    /// Tournament display name.
    pub tournament: String,
    /// Mode of the cycle that produced the update.
    pub mode: DataSource,
    /// Newly persisted events, oldest first.
    pub events: Vec<FeedEvent>,
}

/// Broadcast bus for [`FeedUpdate`]s.
///
/// When the ring buffer is full, the oldest updates are dropped for lagging
/// receivers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<FeedUpdate>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an update to all subscribers.
    ///
    /// Returns the number of receivers that received it. Without active
    /// receivers the update is silently dropped.
    pub fn publish(&self, update: FeedUpdate) -> usize {
        self.sender.send(update).unwrap_or(0)
    }

    /// Creates a new receiver that will receive all future updates.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<FeedUpdate> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
