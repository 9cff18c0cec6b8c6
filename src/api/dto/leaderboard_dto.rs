//! Leaderboard requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::ResponseStatus;
use crate::domain::{DataSource, Standing};
use crate::error::TrackerError;

/// Query parameters of `GET /leaderboard`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct LeaderboardQuery {
    /// `live` or `demo`. Defaults to the configured data source.
    #[serde(default)]
    pub mode: Option<DataSource>,
}

/// Response body of `GET /leaderboard`.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    /// Number of rows.
    pub count: usize,
    /// Top places, best first.
    pub standings: Vec<Standing>,
    /// Outcome marker.
    pub status: ResponseStatus,
    /// Failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LeaderboardResponse {
    /// Successful response.
    #[must_use]
    pub fn ok(standings: Vec<Standing>) -> Self {
        Self {
            count: standings.len(),
            standings,
            status: ResponseStatus::Ok,
            message: None,
        }
    }

    /// Failure response with no rows.
    #[must_use]
    pub fn error(err: &TrackerError) -> Self {
        Self {
            count: 0,
            standings: Vec::new(),
            status: ResponseStatus::Error,
            message: Some(err.to_string()),
        }
    }
}
