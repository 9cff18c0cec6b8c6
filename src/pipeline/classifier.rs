//! Keyword classification of raw feed records.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};

use super::extraction::{BoatNameExtractor, FirstToken};
use crate::domain::{EventKind, FeedEvent};
use crate::fetch::RawRecord;

/// Wall-clock format of feed timestamps, e.g. `Jun 12, 2025 1:45 PM`.
pub const FEED_TIMESTAMP_FORMAT: &str = "%b %d, %Y %I:%M %p";

/// A record whose timestamp text does not match [`FEED_TIMESTAMP_FORMAT`].
#[derive(Debug, thiserror::Error)]
#[error("unrecognized timestamp {raw:?}: {source}")]
pub struct ParseError {
    /// Offending timestamp text.
    pub raw: String,
    /// Underlying chrono error.
    #[source]
    pub source: chrono::ParseError,
}

/// Events produced from a batch, plus the number of unparsable records.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedBatch {
    /// Classified events, in record order.
    pub events: Vec<FeedEvent>,
    /// Records dropped because their timestamp could not be parsed.
    pub rejected: usize,
}

/// Maps raw records to typed [`FeedEvent`]s.
#[derive(Debug, Clone)]
pub struct Classifier {
    extractor: Arc<dyn BoatNameExtractor>,
    offset: FixedOffset,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Arc::new(FirstToken), Utc.fix())
    }
}

impl Classifier {
    /// Creates a classifier using `extractor` for boat names and reading feed
    /// wall-clock times at `offset`.
    #[must_use]
    pub fn new(extractor: Arc<dyn BoatNameExtractor>, offset: FixedOffset) -> Self {
        Self { extractor, offset }
    }

    /// Parses a feed timestamp into an instant.
    ///
    /// Tolerates an `@` between date and time and irregular spacing.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the text does not match
    /// [`FEED_TIMESTAMP_FORMAT`].
    pub fn parse_timestamp(&self, raw: &str) -> Result<DateTime<Utc>, ParseError> {
        let cleaned = raw.replace('@', " ");
        let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
        let naive = NaiveDateTime::parse_from_str(&cleaned, FEED_TIMESTAMP_FORMAT).map_err(
            |source| ParseError {
                raw: raw.to_string(),
                source,
            },
        )?;
        Ok((naive - self.offset).and_utc())
    }

    /// Classifies one record.
    ///
    /// Returns `Ok(None)` when the record is at or before `cutoff`, carries
    /// no recognized keyword, or has no boat name.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the timestamp cannot be parsed.
    pub fn classify(
        &self,
        record: &RawRecord,
        cutoff: Option<DateTime<Utc>>,
    ) -> Result<Option<FeedEvent>, ParseError> {
        let timestamp = self.parse_timestamp(&record.timestamp)?;
        if cutoff.is_some_and(|c| timestamp <= c) {
            return Ok(None);
        }
        let Some(kind) = keyword_kind(&record.text) else {
            return Ok(None);
        };
        let Some(boat) = self.extractor.extract(record) else {
            tracing::debug!(text = %record.text, "record has no boat name");
            return Ok(None);
        };
        Ok(Some(FeedEvent::new(timestamp, boat, kind, &record.text)))
    }

    /// Classifies a batch, skipping (and logging) unparsable records.
    #[must_use]
    pub fn classify_batch(
        &self,
        records: &[RawRecord],
        cutoff: Option<DateTime<Utc>>,
    ) -> ClassifiedBatch {
        let mut batch = ClassifiedBatch::default();
        for record in records {
            match self.classify(record, cutoff) {
                Ok(Some(event)) => batch.events.push(event),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, text = %record.text, "skipping feed record");
                    batch.rejected += 1;
                }
            }
        }
        batch
    }
}

/// Kind implied by the keywords in `text`, checked case-insensitively in
/// priority order `released` > `boated` > `lost`.
#[must_use]
pub fn keyword_kind(text: &str) -> Option<EventKind> {
    let lower = text.to_lowercase();
    if lower.contains("released") {
        Some(EventKind::Released)
    } else if lower.contains("boated") {
        Some(EventKind::Boated)
    } else if lower.contains("lost") {
        Some(EventKind::Other)
    } else {
        None
    }
}
