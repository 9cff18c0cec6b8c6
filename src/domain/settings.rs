//! User-editable settings held by the configuration store.

use std::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Tournament selected when nothing has been configured.
pub const DEFAULT_TOURNAMENT: &str = "Big Rock";

/// Where event data is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Freshly fetched feed, merged into the persisted history.
    #[default]
    Live,
    /// Derived artifact augmented with synthetic hookup events.
    Demo,
}

impl DataSource {
    /// Returns the mode as a static string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Demo => "demo",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide settings, read at the start of every ingestion cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Settings {
    /// Display name of the tracked tournament.
    pub tournament: String,
    /// Event data mode.
    pub data_source: DataSource,
}

impl Settings {
    /// Returns the storage key of the tournament (`"Big Rock"` → `"big_rock"`).
    #[must_use]
    pub fn tournament_key(&self) -> String {
        tournament_key(&self.tournament)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tournament: DEFAULT_TOURNAMENT.to_string(),
            data_source: DataSource::Live,
        }
    }
}

/// Storage key of a tournament display name (`"Big Rock"` → `"big_rock"`).
///
/// The name is trimmed, lowercased and its spaces become `_`. ASCII
/// alphanumerics and `_` are kept; every other UTF-8 byte is written as `-`
/// plus two hex digits. The key is therefore path-safe, non-empty for any
/// non-blank name, and two names share a key only if they are equal after
/// trimming, lowercasing and replacing spaces.
#[must_use]
pub fn tournament_key(tournament: &str) -> String {
    let normalized = tournament.trim().to_lowercase().replace(' ', "_");
    let mut key = String::with_capacity(normalized.len());
    for ch in normalized.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            key.push(ch);
        } else {
            let mut buf = [0_u8; 4];
            for byte in ch.encode_utf8(&mut buf).bytes() {
                let _ = write!(key, "-{byte:02x}");
            }
        }
    }
    key
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn default_is_big_rock_live() {
        let s = Settings::default();
        assert_eq!(s.tournament, "Big Rock");
        assert_eq!(s.data_source, DataSource::Live);
        assert_eq!(s.tournament_key(), "big_rock");
    }

    #[test]
    fn data_source_wire_format() {
        let Ok(s) = serde_json::from_str::<Settings>(r#"{"tournament":"Pirates Cove","data_source":"demo"}"#)
        else {
            panic!("deserialization failed");
        };
        assert_eq!(s.data_source, DataSource::Demo);
        assert_eq!(s.tournament_key(), "pirates_cove");
    }

    #[test]
    fn key_escapes_everything_outside_the_safe_set() {
        assert_eq!(tournament_key("  Big Rock "), "big_rock");
        assert_eq!(tournament_key("Pirate's Cove"), "pirate-27s_cove");
        assert_eq!(tournament_key("big-rock"), "big-2drock");
        assert_ne!(tournament_key("Pirate's Cove"), tournament_key("Pirates Cove"));
    }

    #[test]
    fn non_ascii_name_has_a_non_empty_safe_key() {
        let key = tournament_key("東京カップ");
        assert_eq!(key.len(), 5 * 3 * 3);
        assert!(key.starts_with("-e6-9d-b1"));
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
        assert_ne!(key, tournament_key("東京カップ2"));
    }

    #[test]
    fn unknown_data_source_is_rejected() {
        let parsed =
            serde_json::from_str::<Settings>(r#"{"tournament":"x","data_source":"historical"}"#);
        assert!(parsed.is_err());
    }
}
