//! Derivation of "hooked up" events from terminal events.
//!
//! The feed only reports outcomes. For demo datasets every terminal event
//! gets a preceding [`EventKind::HookedUp`] event, offset backward by a
//! per-boat number of minutes. The offset comes from a fixed FNV-1a hash of
//! the boat identity, so the same input always yields the same output.

use std::collections::HashSet;

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::domain::{BoatIdentity, EventKind, FeedEvent};

/// Details text of every synthesized event.
pub const HOOKUP_DETAILS: &str = "Hooked up!";

/// Smallest hookup offset, in minutes.
pub const MIN_OFFSET_MINUTES: i64 = 3;

/// Number of distinct offsets (3..=29 minutes).
const OFFSET_SPREAD: u32 = 27;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a over the UTF-8 bytes of `s`.
#[must_use]
pub fn stable_hash(s: &str) -> u32 {
    s.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Minutes between a boat's hookup and its terminal event, in `3..=29`.
#[must_use]
pub fn offset_minutes(uid: &BoatIdentity) -> i64 {
    MIN_OFFSET_MINUTES + i64::from(stable_hash(uid.as_str()) % OFFSET_SPREAD)
}

/// Hookup id of the terminal event of `uid` at `timestamp`.
#[must_use]
pub fn hookup_id(uid: &BoatIdentity, timestamp: DateTime<Utc>) -> String {
    format!(
        "{uid}_{}",
        timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

/// Returns `events` plus one synthetic hookup per qualifying terminal event,
/// stably sorted by timestamp.
///
/// A terminal event qualifies unless it already carries a hookup id or its
/// hookup is already present in `events`, which makes the function
/// idempotent.
///
/// The hookup id is keyed on boat and timestamp, so terminal events of the
/// same boat at the same timestamp share a single hookup; only the first of
/// them in input order gets one.
#[must_use]
pub fn synthesize(events: &[FeedEvent]) -> Vec<FeedEvent> {
    let mut known: HashSet<String> = events
        .iter()
        .filter(|e| e.kind == EventKind::HookedUp)
        .filter_map(|e| e.hookup_id.clone())
        .collect();

    let mut synthetic = Vec::new();
    for event in events {
        if !event.kind.is_terminal() || event.hookup_id.is_some() {
            continue;
        }
        let id = hookup_id(&event.uid, event.timestamp);
        if !known.insert(id.clone()) {
            tracing::debug!(hookup_id = %id, boat = %event.boat, "hookup already present, skipping");
            continue;
        }
        synthetic.push(FeedEvent {
            timestamp: event.timestamp - Duration::minutes(offset_minutes(&event.uid)),
            boat: event.boat.clone(),
            uid: event.uid.clone(),
            kind: EventKind::HookedUp,
            details: HOOKUP_DETAILS.to_string(),
            hookup_id: Some(id),
        });
    }

    let mut out = Vec::with_capacity(events.len() + synthetic.len());
    out.extend_from_slice(events);
    out.extend(synthetic);
    out.sort_by_key(|e| e.timestamp);
    out
}
