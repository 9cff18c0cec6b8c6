//! Periodic background refresh.
//!
//! Every tick refreshes the roster (subject to its TTL) and runs one
//! ingestion cycle for the configured tournament and mode. Failures are
//! logged and retried on the next tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::IngestService;

/// Spawns the refresh loop. Returns `None` when `interval` is zero.
#[must_use]
pub fn spawn_refresher(service: Arc<IngestService>, interval: Duration) -> Option<JoinHandle<()>> {
    if interval.is_zero() {
        tracing::info!("background refresh disabled");
        return None;
    }
    tracing::info!(interval_secs = interval.as_secs(), "starting background refresh");

    Some(tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            timer.tick().await;
            refresh_once(&service).await;
        }
    }))
}

/// Runs one refresh pass.
pub async fn refresh_once(service: &IngestService) {
    if let Err(e) = service.participants().await {
        tracing::warn!(error = %e, "background roster refresh failed");
    }
    // Cycle failures are logged by the service.
    let _ = service.refresh_events().await;
}
