//! # tourney-feed
//!
//! Live fishing-tournament activity feed.
//!
//! The service fetches boat rosters and activity-log records for a
//! tournament, classifies them into typed events, merges them into a
//! persisted history without duplicates, and (in demo mode) derives
//! "hooked up" events that the source feed never reports.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── IngestService + refresher (service/)
//!     ├── EventBus, TournamentLocks (domain/)
//!     │
//!     ├── Fetcher ──► Classifier ──► merge ──► synthesize (fetch/, pipeline/)
//!     │
//!     └── ArtifactStore: file | memory | PostgreSQL (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod persistence;
pub mod pipeline;
pub mod service;
pub mod ws;
