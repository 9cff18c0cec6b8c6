//! Per-tournament feed URLs.
//!
//! The catalog is a JSON document keyed by tournament display name:
//!
//! ```json
//! {
//!   "Big Rock": {
//!     "events": "http://localhost:9000/big-rock/activities",
//!     "participants": "http://localhost:9000/big-rock/participants",
//!     "leaderboard": "http://localhost:9000/big-rock/leaderboard"
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::FetchError;
use crate::domain::settings::tournament_key;

/// Error raised while loading the catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The file exists but could not be read.
    #[error("cannot read source catalog {path}: {source}")]
    Io {
        /// Catalog path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid catalog document.
    #[error("invalid source catalog {path}: {source}")]
    Parse {
        /// Catalog path.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Feed URLs of a single tournament.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TournamentSources {
    /// Activity feed URL.
    #[serde(default)]
    pub events: Option<String>,
    /// Participant roster URL.
    #[serde(default)]
    pub participants: Option<String>,
    /// Leaderboard URL.
    #[serde(default)]
    pub leaderboard: Option<String>,
}

/// Lookup table from tournament to feed URLs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SourceCatalog {
    tournaments: HashMap<String, TournamentSources>,
}

impl SourceCatalog {
    /// Loads the catalog from `path`. A missing file yields an empty
    /// catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let shown = path.display().to_string();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %shown, "source catalog not found, no feeds configured");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(CatalogError::Io {
                    path: shown,
                    source,
                });
            }
        };
        Self::from_json(&text).map_err(|source| CatalogError::Parse {
            path: shown,
            source,
        })
    }

    /// Parses a catalog document.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if `text` is not a valid catalog.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Adds or replaces the sources of a tournament.
    pub fn insert(&mut self, tournament: &str, sources: TournamentSources) {
        self.tournaments.insert(tournament.to_string(), sources);
    }

    /// Returns the number of configured tournaments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tournaments.len()
    }

    /// Returns `true` if no tournament is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tournaments.is_empty()
    }

    /// Returns the activity feed URL of `tournament`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingSource`] if none is configured.
    pub fn events_url(&self, tournament: &str) -> Result<&str, FetchError> {
        self.lookup(tournament)
            .and_then(|s| s.events.as_deref())
            .ok_or_else(|| FetchError::MissingSource {
                tournament: tournament.to_string(),
                feed: "events",
            })
    }

    /// Returns the participant roster URL of `tournament`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingSource`] if none is configured.
    pub fn participants_url(&self, tournament: &str) -> Result<&str, FetchError> {
        self.lookup(tournament)
            .and_then(|s| s.participants.as_deref())
            .ok_or_else(|| FetchError::MissingSource {
                tournament: tournament.to_string(),
                feed: "participants",
            })
    }

    /// Returns the leaderboard URL of `tournament`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingSource`] if none is configured.
    pub fn leaderboard_url(&self, tournament: &str) -> Result<&str, FetchError> {
        self.lookup(tournament)
            .and_then(|s| s.leaderboard.as_deref())
            .ok_or_else(|| FetchError::MissingSource {
                tournament: tournament.to_string(),
                feed: "leaderboard",
            })
    }

    /// Exact display-name match first, then by tournament key.
    fn lookup(&self, tournament: &str) -> Option<&TournamentSources> {
        if let Some(sources) = self.tournaments.get(tournament) {
            return Some(sources);
        }
        let wanted = tournament_key(tournament);
        self.tournaments
            .iter()
            .find(|(name, _)| tournament_key(name) == wanted)
            .map(|(_, sources)| sources)
    }
}
