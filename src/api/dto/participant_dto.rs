//! Participant roster responses.

use serde::Serialize;
use utoipa::ToSchema;

use super::common_dto::ResponseStatus;
use crate::domain::Participant;
use crate::error::TrackerError;

/// Response body of `GET /participants` and `POST /participants/refresh`.
///
/// On failure `participants` is empty and `message` carries the reason.
#[derive(Debug, Serialize, ToSchema)]
pub struct ParticipantListResponse {
    /// Number of participants.
    pub count: usize,
    /// Roster entries.
    pub participants: Vec<Participant>,
    /// Outcome marker.
    pub status: ResponseStatus,
    /// Failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ParticipantListResponse {
    /// Successful response.
    #[must_use]
    pub fn ok(participants: Vec<Participant>) -> Self {
        Self {
            count: participants.len(),
            participants,
            status: ResponseStatus::Ok,
            message: None,
        }
    }

    /// Failure response with an empty roster.
    #[must_use]
    pub fn error(err: &TrackerError) -> Self {
        Self {
            count: 0,
            participants: Vec::new(),
            status: ResponseStatus::Error,
            message: Some(err.to_string()),
        }
    }
}
