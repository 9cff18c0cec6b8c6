//! Type-safe boat identifier.
//!
//! [`BoatIdentity`] is a newtype wrapper around the normalized form of a
//! boat's display name, so identities cannot be confused with arbitrary
//! strings (display names, hookup ids, tournament names).

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Image path served when a boat has no cached picture.
pub const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.png";

/// Stable key for a boat, derived from its display name.
///
/// Lower-cased, spaces replaced by `_`, single and double quotes removed.
/// Two display names that normalize identically are the same boat
/// everywhere downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct BoatIdentity(String);

impl BoatIdentity {
    /// Derives the identity of a display name.
    ///
    /// Total and idempotent: the output has no uppercase, spaces or quotes
    /// left, so normalizing it again is a no-op.
    #[must_use]
    pub fn normalize(display_name: &str) -> Self {
        let normalized = display_name
            .to_lowercase()
            .chars()
            .filter(|c| *c != '\'' && *c != '"')
            .map(|c| if c == ' ' { '_' } else { c })
            .collect();
        Self(normalized)
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the public path of this boat's cached picture.
    ///
    /// Only alphanumerics, `_` and `-` survive in the file name. The
    /// extension follows the source URL (`.jpg` when it mentions one,
    /// `.png` otherwise). Without a source URL the placeholder is used.
    #[must_use]
    pub fn image_path(&self, image_url: Option<&str>) -> String {
        let Some(url) = image_url.filter(|u| !u.trim().is_empty()) else {
            return PLACEHOLDER_IMAGE.to_string();
        };
        let safe: String = self
            .0
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        if safe.is_empty() {
            return PLACEHOLDER_IMAGE.to_string();
        }
        let ext = if url.to_lowercase().contains(".jpg") {
            "jpg"
        } else {
            "png"
        };
        format!("/static/images/boats/{safe}.{ext}")
    }
}

impl fmt::Display for BoatIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BoatIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn case_differences_collapse() {
        assert_eq!(
            BoatIdentity::normalize("Reel Deal"),
            BoatIdentity::normalize("REEL DEAL")
        );
    }

    #[test]
    fn spaces_become_underscores() {
        let spaced = BoatIdentity::normalize("Reel Deal");
        assert_eq!(spaced.as_str(), "reel_deal");
        // The normalized spelling is a fixed point, so it names the same boat.
        assert_eq!(spaced, BoatIdentity::normalize("reel_deal"));
    }

    #[test]
    fn quotes_are_stripped() {
        let id = BoatIdentity::normalize("Mama's \"Worry\"");
        assert!(!id.as_str().contains('\''));
        assert!(!id.as_str().contains('"'));
        assert_eq!(id.as_str(), "mamas_worry");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = BoatIdentity::normalize("Sea Wolf's Den");
        let twice = BoatIdentity::normalize(once.as_str());
        assert_eq!(once, twice);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = BoatIdentity::normalize("Top Dog");
        let Ok(json) = serde_json::to_string(&id) else {
            panic!("serialization failed");
        };
        assert_eq!(json, "\"top_dog\"");
    }

    #[test]
    fn image_path_uses_source_extension() {
        let id = BoatIdentity::normalize("Top Dog");
        assert_eq!(
            id.image_path(Some("https://cdn.example/TopDog.JPG")),
            "/static/images/boats/top_dog.jpg"
        );
        assert_eq!(
            id.image_path(Some("https://cdn.example/top.webp")),
            "/static/images/boats/top_dog.png"
        );
    }

    #[test]
    fn image_path_without_source_is_placeholder() {
        let id = BoatIdentity::normalize("Top Dog");
        assert_eq!(id.image_path(None), PLACEHOLDER_IMAGE);
        assert_eq!(id.image_path(Some("  ")), PLACEHOLDER_IMAGE);
    }
}
