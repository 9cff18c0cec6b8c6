//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::IngestService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Ingestion service behind every REST operation.
    pub ingest_service: Arc<IngestService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}

impl AppState {
    /// Builds the state around a service, sharing its event bus.
    #[must_use]
    pub fn new(ingest_service: Arc<IngestService>) -> Self {
        let event_bus = ingest_service.event_bus().clone();
        Self {
            ingest_service,
            event_bus,
        }
    }
}
