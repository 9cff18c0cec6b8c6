//! Normalized activity events.
//!
//! A [`FeedEvent`] is what the classifier makes of one raw feed record, or
//! what the hookup synthesizer derives from a terminal event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::BoatIdentity;

/// Outcome category of an activity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Fish brought aboard.
    Boated,
    /// Fish released.
    Released,
    /// Any other terminal outcome (lost fish, pulled hook, ...).
    Other,
    /// Derived: the boat hooked a fish.
    HookedUp,
}

impl EventKind {
    /// Returns `true` for outcomes that end a hookup.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Boated | Self::Released | Self::Other)
    }

    /// Returns the kind as a static string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boated => "boated",
            Self::Released => "released",
            Self::Other => "other",
            Self::HookedUp => "hooked_up",
        }
    }
}

/// One entry of a tournament's event history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FeedEvent {
    /// Instant the activity happened.
    pub timestamp: DateTime<Utc>,
    /// Boat display name as it appeared in the feed.
    pub boat: String,
    /// Normalized boat identity.
    pub uid: BoatIdentity,
    /// Outcome category.
    pub kind: EventKind,
    /// Original feed text (or the fixed text of a derived event).
    pub details: String,
    /// Links a derived hookup to the terminal event it precedes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hookup_id: Option<String>,
}

/// Identity of an event for duplicate detection.
pub type EventKey<'a> = (DateTime<Utc>, &'a BoatIdentity, EventKind, &'a str);

impl FeedEvent {
    /// Builds a feed event, deriving the identity from the display name.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, boat: &str, kind: EventKind, details: &str) -> Self {
        Self {
            timestamp,
            boat: boat.to_string(),
            uid: BoatIdentity::normalize(boat),
            kind,
            details: details.to_string(),
            hookup_id: None,
        }
    }

    /// Returns the `(timestamp, uid, kind, details)` tuple two stored events
    /// must never share.
    #[must_use]
    pub fn key(&self) -> EventKey<'_> {
        (self.timestamp, &self.uid, self.kind, self.details.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        let Some(ts) = Utc.with_ymd_and_hms(2025, 6, 12, h, m, 0).single() else {
            panic!("valid timestamp");
        };
        ts
    }

    #[test]
    fn terminal_kinds() {
        assert!(EventKind::Boated.is_terminal());
        assert!(EventKind::Released.is_terminal());
        assert!(EventKind::Other.is_terminal());
        assert!(!EventKind::HookedUp.is_terminal());
    }

    #[test]
    fn new_derives_uid() {
        let event = FeedEvent::new(at(9, 0), "Reel Deal", EventKind::Boated, "Reel Deal boated");
        assert_eq!(event.uid.as_str(), "reel_deal");
        assert!(event.hookup_id.is_none());
    }

    #[test]
    fn serializes_without_hookup_id_when_absent() {
        let event = FeedEvent::new(at(9, 0), "Reel Deal", EventKind::Released, "released");
        let Ok(json) = serde_json::to_string(&event) else {
            panic!("serialization failed");
        };
        assert!(json.contains("\"kind\":\"released\""));
        assert!(!json.contains("hookup_id"));
    }

    #[test]
    fn keys_ignore_display_spelling() {
        let a = FeedEvent::new(at(9, 0), "Reel Deal", EventKind::Boated, "x");
        let b = FeedEvent::new(at(9, 0), "REEL DEAL", EventKind::Boated, "x");
        assert_eq!(a.key(), b.key());
    }
}
