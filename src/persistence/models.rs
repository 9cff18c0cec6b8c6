//! On-disk layouts of the stored artifacts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{FeedEvent, Participant, Standing};

/// Stored participant roster, tagged with the tournament it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterArtifact {
    /// Tournament display name.
    pub tournament: String,
    /// Registered boats.
    pub participants: Vec<Participant>,
}

/// Stored event history of one tournament, ascending by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryArtifact {
    /// Tournament display name.
    pub tournament: String,
    /// Ordered, duplicate-free history.
    pub events: Vec<FeedEvent>,
}

/// Last non-empty leaderboard fetched for one tournament, best place first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardArtifact {
    /// Tournament display name.
    pub tournament: String,
    /// Every published row, not only the places served.
    pub standings: Vec<Standing>,
}

/// Demo-derived events of one tournament.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemoEntry {
    /// History plus synthesized hookups, ascending by timestamp.
    pub events: Vec<FeedEvent>,
}

/// Demo artifact: one entry per tournament name, in stable key order.
pub type DemoArtifact = BTreeMap<String, DemoEntry>;

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::EventKind;
    use chrono::{TimeZone, Utc};

    fn text_at<'a>(value: &'a serde_json::Value, pointer: &str) -> Option<&'a str> {
        value.pointer(pointer).and_then(serde_json::Value::as_str)
    }

    #[test]
    fn demo_artifact_layout() {
        let Some(ts) = Utc.with_ymd_and_hms(2025, 6, 12, 9, 0, 0).single() else {
            panic!("valid timestamp");
        };
        let mut demo = DemoArtifact::new();
        demo.insert(
            "Big Rock".to_string(),
            DemoEntry {
                events: vec![FeedEvent::new(ts, "Reel", EventKind::Boated, "Reel boated")],
            },
        );
        let Ok(value) = serde_json::to_value(&demo) else {
            panic!("serialization failed");
        };
        assert_eq!(text_at(&value, "/Big Rock/events/0/uid"), Some("reel"));
        assert_eq!(text_at(&value, "/Big Rock/events/0/kind"), Some("boated"));
    }

    #[test]
    fn roster_layout() {
        let roster = RosterArtifact {
            tournament: "Big Rock".to_string(),
            participants: vec![Participant::new("Reel Deal", "Sportfish", None)],
        };
        let Ok(value) = serde_json::to_value(&roster) else {
            panic!("serialization failed");
        };
        assert_eq!(text_at(&value, "/tournament"), Some("Big Rock"));
        assert_eq!(text_at(&value, "/participants/0/uid"), Some("reel_deal"));
    }
}
