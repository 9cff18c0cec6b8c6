//! Tournament participants (boats on the roster).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::BoatIdentity;

/// A boat registered in the current tournament.
///
/// The roster is replaced wholesale by every successful participant fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Participant {
    /// Display name.
    pub boat: String,
    /// Category string as published by the tournament (e.g. `"Sportfish"`).
    #[serde(rename = "type")]
    pub category: String,
    /// Normalized identity.
    pub uid: BoatIdentity,
    /// Public path of the boat's picture.
    pub image_path: String,
}

impl Participant {
    /// Builds a participant from its display name, category and the
    /// optional URL of its picture on the tournament site.
    #[must_use]
    pub fn new(boat: &str, category: &str, image_url: Option<&str>) -> Self {
        let boat = boat.trim();
        let uid = BoatIdentity::normalize(boat);
        let image_path = uid.image_path(image_url);
        Self {
            boat: boat.to_string(),
            category: category.trim().to_string(),
            uid,
            image_path,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::boat_identity::PLACEHOLDER_IMAGE;

    #[test]
    fn new_computes_identity_and_image() {
        let p = Participant::new("Sea Wolf", "Sportfish", Some("https://x/sea.jpg"));
        assert_eq!(p.uid.as_str(), "sea_wolf");
        assert_eq!(p.image_path, "/static/images/boats/sea_wolf.jpg");
    }

    #[test]
    fn category_serializes_as_type() {
        let p = Participant::new("Sea Wolf", "Sportfish", None);
        assert_eq!(p.image_path, PLACEHOLDER_IMAGE);
        let Ok(json) = serde_json::to_string(&p) else {
            panic!("serialization failed");
        };
        assert!(json.contains("\"type\":\"Sportfish\""));
    }
}
