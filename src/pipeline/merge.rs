//! Incremental merge of freshly classified events into a stored history.
//!
//! The merge itself never drops anything: duplicate avoidance comes from the
//! classifier's cutoff filter. What the merge does guarantee is that a
//! history violating the ordering or uniqueness invariants is reported as an
//! [`IntegrityError`] instead of being persisted.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::domain::{BoatIdentity, EventKind, FeedEvent};

/// A history that breaks a stored-event invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    /// Two events share `(timestamp, uid, kind, details)`.
    #[error("duplicate {kind:?} event for {uid} at {timestamp}")]
    Duplicate {
        /// Shared timestamp.
        timestamp: DateTime<Utc>,
        /// Shared boat identity.
        uid: BoatIdentity,
        /// Shared kind.
        kind: EventKind,
    },

    /// An event is earlier than its predecessor.
    #[error("event at position {index} ({timestamp}) precedes its predecessor")]
    OutOfOrder {
        /// Position of the offending event.
        index: usize,
        /// Its timestamp.
        timestamp: DateTime<Utc>,
    },
}

/// Appends `incoming` to `existing` and stably sorts by timestamp.
///
/// Events with equal timestamps keep their arrival order, existing before
/// incoming.
///
/// # Errors
///
/// Returns an [`IntegrityError`] if the merged history contains a duplicate.
pub fn merge(
    existing: Vec<FeedEvent>,
    incoming: Vec<FeedEvent>,
) -> Result<Vec<FeedEvent>, IntegrityError> {
    let mut merged = existing;
    merged.extend(incoming);
    merged.sort_by_key(|e| e.timestamp);
    verify_history(&merged)?;
    Ok(merged)
}

/// Checks the ordering and uniqueness invariants of a history.
///
/// # Errors
///
/// Returns the first violation found.
pub fn verify_history(events: &[FeedEvent]) -> Result<(), IntegrityError> {
    let mut seen = HashSet::with_capacity(events.len());
    let mut previous: Option<DateTime<Utc>> = None;
    for (index, event) in events.iter().enumerate() {
        if previous.is_some_and(|p| event.timestamp < p) {
            return Err(IntegrityError::OutOfOrder {
                index,
                timestamp: event.timestamp,
            });
        }
        previous = Some(event.timestamp);

        if !seen.insert(event.key()) {
            return Err(IntegrityError::Duplicate {
                timestamp: event.timestamp,
                uid: event.uid.clone(),
                kind: event.kind,
            });
        }
    }
    Ok(())
}

/// Timestamp of the newest stored event, used as the next fetch's cutoff.
#[must_use]
pub fn latest_timestamp(events: &[FeedEvent]) -> Option<DateTime<Utc>> {
    events.iter().map(|e| e.timestamp).max()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::fetch::RawRecord;
    use crate::pipeline::Classifier;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        let Some(ts) = Utc.with_ymd_and_hms(2025, 6, 12, h, m, 0).single() else {
            panic!("valid timestamp");
        };
        ts
    }

    fn event(h: u32, m: u32, boat: &str, details: &str) -> FeedEvent {
        FeedEvent::new(at(h, m), boat, EventKind::Boated, details)
    }

    #[test]
    fn merge_sorts_by_timestamp() {
        let existing = vec![event(9, 0, "A", "a"), event(11, 0, "B", "b")];
        let incoming = vec![event(10, 0, "C", "c")];
        let Ok(merged) = merge(existing, incoming) else {
            panic!("merge failed");
        };
        let order: Vec<&str> = merged.iter().map(|e| e.boat.as_str()).collect();
        assert_eq!(order, vec!["A", "C", "B"]);
    }

    #[test]
    fn equal_timestamps_keep_existing_first() {
        let existing = vec![event(9, 0, "Old", "old")];
        let incoming = vec![event(9, 0, "New", "new")];
        let Ok(merged) = merge(existing, incoming) else {
            panic!("merge failed");
        };
        assert_eq!(merged.first().map(|e| e.boat.as_str()), Some("Old"));
        assert_eq!(merged.get(1).map(|e| e.boat.as_str()), Some("New"));
    }

    #[test]
    fn merge_with_empty_batch_is_identity() {
        let existing = vec![event(9, 0, "A", "a"), event(10, 0, "B", "b")];
        let Ok(merged) = merge(existing.clone(), Vec::new()) else {
            panic!("merge failed");
        };
        assert_eq!(merged, existing);
    }

    #[test]
    fn duplicate_is_reported_not_dropped() {
        let existing = vec![event(9, 0, "A", "a")];
        let incoming = vec![event(9, 0, "a", "a")];
        let Err(IntegrityError::Duplicate { uid, .. }) = merge(existing, incoming) else {
            panic!("expected duplicate");
        };
        assert_eq!(uid.as_str(), "a");
    }

    #[test]
    fn verify_detects_out_of_order() {
        let history = vec![event(10, 0, "A", "a"), event(9, 0, "B", "b")];
        assert!(matches!(
            verify_history(&history),
            Err(IntegrityError::OutOfOrder { index: 1, .. })
        ));
    }

    #[test]
    fn latest_timestamp_of_empty_is_none() {
        assert_eq!(latest_timestamp(&[]), None);
        assert_eq!(
            latest_timestamp(&[event(9, 0, "A", "a"), event(10, 0, "B", "b")]),
            Some(at(10, 0))
        );
    }

    #[test]
    fn overlapping_fetches_do_not_duplicate() {
        let classifier = Classifier::default();
        let page_one = vec![
            RawRecord::new("", "Reel boated a blue", "Jun 12, 2025 9:00 AM"),
            RawRecord::new("", "Sea released a white", "Jun 12, 2025 9:10 AM"),
        ];
        let page_two = vec![
            RawRecord::new("", "Sea released a white", "Jun 12, 2025 9:10 AM"),
            RawRecord::new("", "Top lost one", "Jun 12, 2025 9:20 AM"),
        ];

        let first = classifier.classify_batch(&page_one, None);
        let Ok(history) = merge(Vec::new(), first.events) else {
            panic!("first merge failed");
        };
        let second = classifier.classify_batch(&page_two, latest_timestamp(&history));
        let Ok(history) = merge(history, second.events) else {
            panic!("second merge failed");
        };

        assert_eq!(history.len(), 3);
        assert!(verify_history(&history).is_ok());
        assert!(history.windows(2).all(|w| match w {
            [a, b] => a.timestamp <= b.timestamp,
            _ => true,
        }));
    }

    #[test]
    fn end_to_end_two_cycles() {
        let classifier = Classifier::default();
        let records = vec![
            RawRecord::new("", "Reel weighed in at the scales", "Jun 12, 2025 9:00 AM"),
            RawRecord::new("", "Sea boated a blue marlin", "Jun 12, 2025 9:10 AM"),
            RawRecord::new("", "Top released a sailfish", "Jun 12, 2025 9:20 AM"),
        ];

        let batch = classifier.classify_batch(&records, None);
        let Ok(history) = merge(Vec::new(), batch.events) else {
            panic!("merge failed");
        };
        assert_eq!(history.len(), 2);
        assert_eq!(history.first().map(|e| e.timestamp), Some(at(9, 10)));
        assert_eq!(history.get(1).map(|e| e.timestamp), Some(at(9, 20)));

        let again = classifier.classify_batch(&records, latest_timestamp(&history));
        assert!(again.events.is_empty());
    }
}
