//! Leaderboard standings.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::BoatIdentity;

/// Number of places the leaderboard shows.
pub const LEADERBOARD_PLACES: usize = 3;

/// One place on a tournament leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Standing {
    /// Boat display name.
    pub boat: String,
    /// Normalized identity.
    pub uid: BoatIdentity,
    /// Score as published (e.g. `"1,250 Points"` or `"512.4 lb"`).
    pub points: String,
}

impl Standing {
    /// Builds a standing from the published boat name and score text.
    #[must_use]
    pub fn new(boat: &str, points: &str) -> Self {
        let boat = boat.trim();
        Self {
            boat: boat.to_string(),
            uid: BoatIdentity::normalize(boat),
            points: points.trim().to_string(),
        }
    }
}
