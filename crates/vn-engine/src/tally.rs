//! Per-session outcome counters.

use std::collections::BTreeMap;

use vn_core::Outcome;

/// How many times each outcome tag has been reached in one session.
///
/// Repeat visits count again. Menu outcomes are never counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeTally {
    counts: BTreeMap<String, u32>,
}

impl OutcomeTally {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one traversal of a passage with this outcome.
    pub fn record(&mut self, outcome: &Outcome) {
        if outcome.is_tallied() {
            *self.counts.entry(outcome.tag.clone()).or_insert(0) += 1;
        }
    }

    /// Count for a tag (0 if never reached).
    pub fn count(&self, tag: &str) -> u32 {
        self.counts.get(tag).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Iterate `(tag, count)` pairs in tag order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(tag, count)| (tag.as_str(), *count))
    }

    /// Clear all counts.
    pub fn reset(&mut self) {
        self.counts.clear();
    }
}
