//! Persistence layer: an abstract key-value artifact store.
//!
//! The pipeline only needs `get` and an atomic `put` (replace the whole value
//! or leave the old one untouched). Backends:
//!
//! - [`FileStore`]: one JSON file per key, written via temp file + rename.
//! - [`MemoryStore`]: process-local, for tests and throwaway runs.
//! - [`PostgresStore`]: a single `artifacts` table accessed with `sqlx`.

pub mod file;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod settings_store;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use settings_store::SettingsStore;

/// Well-known artifact keys.
pub mod keys {
    use crate::domain::settings::tournament_key;

    /// Participant roster (one per deployment).
    pub const PARTICIPANTS: &str = "participants";
    /// Demo-derived events of every tournament.
    pub const DEMO_EVENTS: &str = "demo_events";
    /// User-editable settings.
    pub const SETTINGS: &str = "settings";

    /// Event history of one tournament, by display name.
    #[must_use]
    pub fn event_history(tournament: &str) -> String {
        format!("events/{}", tournament_key(tournament))
    }

    /// Cached leaderboard of one tournament, by display name.
    #[must_use]
    pub fn leaderboard(tournament: &str) -> String {
        format!("leaderboard/{}", tournament_key(tournament))
    }
}

/// Failure of a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("i/o error on artifact {key}: {source}")]
    Io {
        /// Artifact key.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Artifact content could not be encoded or decoded.
    #[error("malformed artifact {key}: {source}")]
    Serialization {
        /// Artifact key.
        key: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Key rejected by the backend.
    #[error("invalid artifact key {0:?}")]
    InvalidKey(String),
}

/// Raw content of an artifact and when it was last replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    /// Serialized content.
    pub bytes: Vec<u8>,
    /// Time of the last successful `put`.
    pub modified_at: DateTime<Utc>,
}

/// Key-value capability with all-or-nothing writes.
///
/// Readers must never observe a partially written value.
#[async_trait]
pub trait ArtifactStore: fmt::Debug + Send + Sync {
    /// Returns the artifact stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on backend failure.
    async fn get(&self, key: &str) -> Result<Option<StoredArtifact>, StoreError>;

    /// Atomically replaces the artifact stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on backend failure; the previous value is
    /// then still in place.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError>;
}

/// Reads and decodes a JSON artifact together with its modification time.
///
/// # Errors
///
/// Returns a [`StoreError`] on backend failure or malformed content.
pub async fn load_json<T: DeserializeOwned>(
    store: &dyn ArtifactStore,
    key: &str,
) -> Result<Option<(T, DateTime<Utc>)>, StoreError> {
    let Some(artifact) = store.get(key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_slice(&artifact.bytes).map_err(|source| {
        StoreError::Serialization {
            key: key.to_string(),
            source,
        }
    })?;
    Ok(Some((value, artifact.modified_at)))
}

/// Encodes `value` as pretty JSON and atomically stores it.
///
/// Encoding is deterministic, so an unchanged value re-persists
/// byte-identically.
///
/// # Errors
///
/// Returns a [`StoreError`] on encoding or backend failure.
pub async fn save_json<T: Serialize + ?Sized>(
    store: &dyn ArtifactStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let mut bytes =
        serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serialization {
            key: key.to_string(),
            source,
        })?;
    bytes.push(b'\n');
    store.put(key, bytes).await
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        count: u32,
    }

    #[test]
    fn event_history_key_is_path_safe() {
        assert_eq!(keys::event_history("Big Rock"), "events/big_rock");
        assert_eq!(
            keys::event_history("Pirate's Cove/../x"),
            "events/pirate-27s_cove-2f-2e-2e-2fx"
        );
        assert_eq!(keys::leaderboard("Big Rock"), "leaderboard/big_rock");
    }

    #[tokio::test]
    async fn json_round_trip_through_store() {
        let store = MemoryStore::new();
        let doc = Doc {
            name: "big rock".to_string(),
            count: 3,
        };
        tokio_test::assert_ok!(save_json(&store, "doc", &doc).await);

        let Ok(Some((loaded, _))) = load_json::<Doc>(&store, "doc").await else {
            panic!("expected document");
        };
        assert_eq!(loaded, doc);
    }

    #[tokio::test]
    async fn missing_key_loads_none() {
        let store = MemoryStore::new();
        let loaded = load_json::<Doc>(&store, "absent").await;
        assert!(matches!(loaded, Ok(None)));
    }

    #[tokio::test]
    async fn malformed_content_is_serialization_error() {
        let store = MemoryStore::new();
        tokio_test::assert_ok!(store.put("doc", b"{ nope".to_vec()).await);
        let loaded = load_json::<Doc>(&store, "doc").await;
        assert!(matches!(loaded, Err(StoreError::Serialization { .. })));
    }
}
