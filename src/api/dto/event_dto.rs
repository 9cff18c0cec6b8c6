//! Event feed requests and responses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::ResponseStatus;
use crate::domain::boat_identity::PLACEHOLDER_IMAGE;
use crate::domain::{BoatIdentity, DataSource, FeedEvent};
use crate::error::TrackerError;
use crate::service::CycleReport;

/// Query parameters of `GET /events`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct EventsQuery {
    /// `live` or `demo`. Defaults to the configured data source.
    #[serde(default)]
    pub mode: Option<DataSource>,
}

/// A feed event with the picture of its boat.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventDto {
    /// The event itself.
    #[serde(flatten)]
    pub event: FeedEvent,
    /// Roster picture of the boat, or the placeholder.
    pub image_path: String,
}

impl EventDto {
    /// Attaches image paths from `images` to `events`.
    #[must_use]
    pub fn enrich(events: Vec<FeedEvent>, images: &HashMap<BoatIdentity, String>) -> Vec<Self> {
        events
            .into_iter()
            .map(|event| {
                let image_path = images
                    .get(&event.uid)
                    .cloned()
                    .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());
                Self { event, image_path }
            })
            .collect()
    }
}

/// Response body of `GET /events` and `GET /events/hooked`.
///
/// On failure `events` is empty and `message` carries the reason.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventListResponse {
    /// Number of events.
    pub count: usize,
    /// Events, oldest first.
    pub events: Vec<EventDto>,
    /// Outcome marker.
    pub status: ResponseStatus,
    /// Failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EventListResponse {
    /// Successful response.
    #[must_use]
    pub fn ok(events: Vec<EventDto>) -> Self {
        Self {
            count: events.len(),
            events,
            status: ResponseStatus::Ok,
            message: None,
        }
    }

    /// Failure response with no events.
    #[must_use]
    pub fn error(err: &TrackerError) -> Self {
        Self {
            count: 0,
            events: Vec::new(),
            status: ResponseStatus::Error,
            message: Some(err.to_string()),
        }
    }
}

/// Response body of `POST /events/refresh`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshEventsResponse {
    /// Outcome marker.
    pub status: ResponseStatus,
    /// Summary of the completed cycle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<CycleReport>,
    /// Failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
