//! Ledger record types and their saved representation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether (and how) one ending has been reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndingRecord {
    /// Set once the ending is reached; never cleared.
    pub reached: bool,
    /// Outcome tag of the passage that produced this ending, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    /// When the ending was first reached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_reached_at: Option<DateTime<Utc>>,
}

impl EndingRecord {
    /// A registered but not yet reached ending.
    pub fn unreached(outcome: Option<String>) -> Self {
        Self {
            reached: false,
            outcome,
            first_reached_at: None,
        }
    }

    /// Fold another record into this one. Reached flags only ever turn on,
    /// and the earliest known timestamp wins.
    pub fn merge(&mut self, other: EndingRecord) {
        if self.outcome.is_none() {
            self.outcome = other.outcome;
        }
        self.first_reached_at = match (self.first_reached_at, other.first_reached_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.reached |= other.reached;
    }
}

/// The persisted form of the ledger: passage name to record.
pub type LedgerState = BTreeMap<String, EndingRecord>;

/// Any shape a saved record may take, including older formats.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SavedRecord {
    /// Current format.
    Record(EndingRecord),
    /// `"name": true`
    Flag(bool),
    /// Legacy format: `"name": "BAD-END"`, the outcome tag of a reached ending.
    Tag(String),
}

impl From<SavedRecord> for EndingRecord {
    fn from(saved: SavedRecord) -> Self {
        match saved {
            SavedRecord::Record(record) => record,
            SavedRecord::Flag(reached) => Self {
                reached,
                ..Self::default()
            },
            SavedRecord::Tag(tag) => Self {
                reached: true,
                outcome: Some(tag),
                first_reached_at: None,
            },
        }
    }
}

/// Decode saved ledger JSON, migrating older record formats.
pub fn decode_state(json: &str) -> serde_json::Result<LedgerState> {
    let saved: BTreeMap<String, SavedRecord> = serde_json::from_str(json)?;
    Ok(saved.into_iter().map(|(k, v)| (k, v.into())).collect())
}

/// Encode a ledger state as JSON.
pub fn encode_state(state: &LedgerState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(state)
}
