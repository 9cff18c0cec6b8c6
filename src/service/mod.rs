//! Service layer: business logic orchestration.
//!
//! [`IngestService`] runs ingestion cycles, serves the façade's read paths
//! and publishes new events through the [`super::domain::EventBus`].
//! [`spawn_refresher`] drives it periodically in the background.

pub mod ingest_service;
pub mod refresher;

pub use ingest_service::{
    CycleOutcome, CycleReport, CycleState, IngestOptions, IngestService, SettingsUpdate,
};
pub use refresher::spawn_refresher;
