//! Boat-name extraction policies.
//!
//! The feed does not mark up the boat name inside an item's text, so the
//! classifier delegates that decision to a [`BoatNameExtractor`]. The
//! default policy takes the first whitespace-delimited token of the text,
//! which is known to truncate multi-word names ("Reel Deal boated ..."
//! yields "Reel"). Swap the policy rather than patching the classifier.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::fetch::RawRecord;

/// Chooses the boat display name of a raw record.
pub trait BoatNameExtractor: fmt::Debug + Send + Sync {
    /// Returns the boat display name, or `None` when the record has none.
    fn extract<'a>(&self, record: &'a RawRecord) -> Option<&'a str>;
}

/// First whitespace-delimited token of the item text.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstToken;

impl BoatNameExtractor for FirstToken {
    fn extract<'a>(&self, record: &'a RawRecord) -> Option<&'a str> {
        record.text.split_whitespace().next()
    }
}

/// The record's boat-name hint, falling back to [`FirstToken`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BoatHint;

impl BoatNameExtractor for BoatHint {
    fn extract<'a>(&self, record: &'a RawRecord) -> Option<&'a str> {
        let hint = record.boat.trim();
        if hint.is_empty() {
            FirstToken.extract(record)
        } else {
            Some(hint)
        }
    }
}

/// Configurable selection of an extraction policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoatNameSource {
    /// Use [`FirstToken`].
    #[default]
    FirstToken,
    /// Use [`BoatHint`].
    Hint,
}

impl BoatNameSource {
    /// Instantiates the selected policy.
    #[must_use]
    pub fn extractor(self) -> Arc<dyn BoatNameExtractor> {
        match self {
            Self::FirstToken => Arc::new(FirstToken),
            Self::Hint => Arc::new(BoatHint),
        }
    }
}

impl FromStr for BoatNameSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first_token" => Ok(Self::FirstToken),
            "hint" => Ok(Self::Hint),
            other => Err(format!("unknown boat name source: {other}")),
        }
    }
}
