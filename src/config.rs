//! Process configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). User-editable settings (tournament,
//! data source) are not configured here; they live in the
//! [`crate::persistence::SettingsStore`].

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::FixedOffset;

use crate::pipeline::BoatNameSource;
use crate::pipeline::freshness::DEFAULT_PARTICIPANT_TTL_SECS;

/// Invalid configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but its value is not acceptable.
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
        /// What was expected.
        reason: String,
    },

    /// A variable required by another setting is missing.
    #[error("{key} is required when {because}")]
    Missing {
        /// Variable name.
        key: &'static str,
        /// Setting that requires it.
        because: &'static str,
    },
}

/// Where artifacts are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// One JSON file per artifact below `DATA_DIR`.
    #[default]
    File,
    /// In-process only; lost on restart.
    Memory,
    /// PostgreSQL `artifacts` table at `DATABASE_URL`.
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level process configuration.
///
/// Loaded once at startup via [`TrackerConfig::from_env`].
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Artifact storage backend.
    pub storage_backend: StorageBackend,

    /// Directory of the file backend.
    pub data_dir: PathBuf,

    /// PostgreSQL connection string (postgres backend only).
    pub database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_connect_timeout_secs: u64,

    /// Path of the tournament source catalog.
    pub sources_file: PathBuf,

    /// Upper bound of a single fetch, in seconds.
    pub fetch_timeout_secs: u64,

    /// Participant roster TTL, in seconds.
    pub participant_ttl_secs: u64,

    /// Seconds between background refreshes (0 = disabled).
    pub refresh_interval_secs: u64,

    /// UTC offset of the wall-clock timestamps printed by the feed.
    pub feed_utc_offset: FixedOffset,

    /// How boat names are taken from feed records.
    pub boat_name_source: BoatNameSource,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Upper bound of a whole HTTP request, in seconds.
    pub request_timeout_secs: u64,

    /// Log output format.
    pub log_format: LogFormat,
}

impl TrackerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable is set to an unusable value,
    /// or if the postgres backend is selected without `DATABASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`TrackerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let listen_addr = parse_required(&lookup, "LISTEN_ADDR", "0.0.0.0:3000")?;
        let storage_backend = parse_required(&lookup, "STORAGE_BACKEND", "file")?;
        let boat_name_source = parse_required(&lookup, "BOAT_NAME_SOURCE", "first_token")?;

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing {
                key: "DATABASE_URL",
                because: "STORAGE_BACKEND=postgres",
            });
        }

        let offset_minutes: i32 = parse_env(&lookup, "FEED_UTC_OFFSET_MINUTES", 0);
        let feed_utc_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ConfigError::Invalid {
                key: "FEED_UTC_OFFSET_MINUTES",
                value: offset_minutes.to_string(),
                reason: "offset must be within ±24h".to_string(),
            })?;

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            storage_backend,
            data_dir: lookup("DATA_DIR").map_or_else(|| PathBuf::from("data"), PathBuf::from),
            database_url,
            database_max_connections: parse_env(&lookup, "DATABASE_MAX_CONNECTIONS", 5),
            database_connect_timeout_secs: parse_env(&lookup, "DATABASE_CONNECT_TIMEOUT_SECS", 5),
            sources_file: lookup("SOURCES_FILE")
                .map_or_else(|| PathBuf::from("sources.json"), PathBuf::from),
            fetch_timeout_secs: parse_env(&lookup, "FETCH_TIMEOUT_SECS", 60),
            participant_ttl_secs: parse_env(
                &lookup,
                "PARTICIPANT_TTL_SECS",
                DEFAULT_PARTICIPANT_TTL_SECS,
            ),
            refresh_interval_secs: parse_env(&lookup, "REFRESH_INTERVAL_SECS", 600),
            feed_utc_offset,
            boat_name_source,
            event_bus_capacity: parse_env(&lookup, "EVENT_BUS_CAPACITY", 1_024),
            request_timeout_secs: parse_env(&lookup, "REQUEST_TIMEOUT_SECS", 90),
            log_format,
        })
    }

    /// Fetch bound as a [`Duration`].
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Request bound as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Background refresh period as a [`Duration`] (zero when disabled).
    #[must_use]
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

/// Parses a variable as `T`, returning `default` on missing or invalid
/// values.
fn parse_env<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parses a variable as `T`, falling back to parsing `default` when unset.
/// A set but invalid value is an error.
fn parse_required<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = lookup(key).unwrap_or_else(|| default.to_string());
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: value.clone(),
        reason: e.to_string(),
    })
}
