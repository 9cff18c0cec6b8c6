//! Fetch layer: the boundary to the tournament site.
//!
//! A [`Fetcher`] returns raw per-item records (free text, a timestamp
//! string, a boat-name hint) for the activity feed and the participant
//! roster. Page rendering and HTML extraction live behind this trait;
//! everything after it is handled by [`crate::pipeline`].

pub mod catalog;
pub mod http;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use catalog::{CatalogError, SourceCatalog, TournamentSources};
pub use http::HttpFetcher;

/// One activity-feed item as extracted from the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Boat name shown next to the item, when the page has one.
    #[serde(default)]
    pub boat: String,
    /// Free text of the item (e.g. `"Reel Deal boated a blue marlin"`).
    pub text: String,
    /// Timestamp text (e.g. `"Jun 12, 2025 1:45 PM"`).
    pub timestamp: String,
}

impl RawRecord {
    /// Creates a record from its three text parts.
    #[must_use]
    pub fn new(boat: &str, text: &str, timestamp: &str) -> Self {
        Self {
            boat: boat.to_string(),
            text: text.to_string(),
            timestamp: timestamp.to_string(),
        }
    }
}

/// One roster entry as extracted from the participants page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawParticipant {
    /// Boat display name.
    pub boat: String,
    /// Category text.
    #[serde(rename = "type", default)]
    pub category: String,
    /// URL of the boat's picture on the tournament site.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// One leaderboard row as extracted from the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStanding {
    /// Boat display name.
    pub boat: String,
    /// Score text.
    #[serde(default)]
    pub points: String,
}

/// Failure of a page fetch. Always aborts the ingestion cycle.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The fetch did not complete within the configured bound.
    #[error("fetch of {url} timed out after {secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Bound that elapsed, in seconds.
        secs: u64,
    },

    /// The page could not be loaded.
    #[error("navigation to {url} failed: {reason}")]
    Navigation {
        /// Requested URL.
        url: String,
        /// Transport or status failure.
        reason: String,
    },

    /// The page loaded but did not contain the expected items.
    #[error("expected content missing at {url}: {reason}")]
    MissingContent {
        /// Requested URL.
        url: String,
        /// What was missing or malformed.
        reason: String,
    },

    /// The source catalog has no URL for this tournament.
    #[error("no {feed} source configured for tournament {tournament:?}")]
    MissingSource {
        /// Tournament display name.
        tournament: String,
        /// Which feed was requested (`"events"`, `"participants"` or
        /// `"leaderboard"`).
        feed: &'static str,
    },
}

/// Page-fetching capability.
///
/// Implementations must report timeouts and navigation failures as
/// distinguishable [`FetchError`] variants. Callers additionally bound
/// every call with their own timeout.
#[async_trait]
pub trait Fetcher: fmt::Debug + Send + Sync {
    /// Fetches the activity-feed items published at `url`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the page cannot be loaded or parsed.
    async fn fetch_events(&self, url: &str) -> Result<Vec<RawRecord>, FetchError>;

    /// Fetches the participant roster published at `url`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the page cannot be loaded, parsed,
    /// or lists no participants.
    async fn fetch_participants(&self, url: &str) -> Result<Vec<RawParticipant>, FetchError>;

    /// Fetches the leaderboard rows published at `url`, best place first.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the page cannot be loaded or parsed.
    async fn fetch_leaderboard(&self, url: &str) -> Result<Vec<RawStanding>, FetchError>;
}
