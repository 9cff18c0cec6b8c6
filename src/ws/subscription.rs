//! Per-connection subscription manager.
//!
//! Tracks which tournaments a WebSocket client follows and provides
//! server-side filtering of feed updates. Tournaments are compared by
//! storage key, so `"Big Rock"` and `"big rock"` are the same subscription.

use std::collections::HashSet;

use crate::domain::settings::tournament_key;

/// Wildcard subscription token.
pub const WILDCARD: &str = "*";

/// Manages the set of tournament subscriptions for a single connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed tournament keys. Ignored while `subscribe_all` is set.
    tournaments: HashSet<String>,
    /// Whether the client follows every tournament.
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds tournaments to the subscription set. [`WILDCARD`] enables
    /// all tournaments.
    pub fn subscribe(&mut self, tournaments: &[String]) {
        for name in tournaments {
            if name.trim() == WILDCARD {
                self.subscribe_all = true;
            } else if !name.trim().is_empty() {
                self.tournaments.insert(tournament_key(name));
            }
        }
    }

    /// Removes tournaments from the subscription set. [`WILDCARD`] clears
    /// the wildcard.
    pub fn unsubscribe(&mut self, tournaments: &[String]) {
        for name in tournaments {
            if name.trim() == WILDCARD {
                self.subscribe_all = false;
            } else {
                self.tournaments.remove(&tournament_key(name));
            }
        }
    }

    /// Returns `true` if updates of `tournament` should be delivered.
    #[must_use]
    pub fn matches(&self, tournament: &str) -> bool {
        self.subscribe_all || self.tournaments.contains(&tournament_key(tournament))
    }

    /// Returns the number of explicitly subscribed tournaments.
    #[must_use]
    pub fn count(&self) -> usize {
        self.tournaments.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}
