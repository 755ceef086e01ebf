//! The endings ledger: which terminal passages the player has ever reached.
//!
//! The ledger outlives sessions. It is seeded from the graph's ending passages,
//! hydrated from a [`LedgerStore`] at startup, and written back after every
//! ending. A reached ending never becomes unreached again.
//!
//! Records for names the current story does not contain (an ending renamed
//! or removed since the save was written) are kept and written back, but are
//! left out of counts and iteration.

pub mod record;
pub mod store;

use std::collections::BTreeSet;

use chrono::Utc;
use vn_core::{PassageGraph, classify};

use crate::error::LedgerResult;

pub use record::{EndingRecord, LedgerState};
pub use store::{FileStore, LedgerStore, MemoryStore};

/// Profile-wide record of reached endings, keyed by passage name.
#[derive(Debug, Clone, Default)]
pub struct EndingsLedger {
    entries: LedgerState,
    // Ending names in the current story.
    story: BTreeSet<String>,
}

impl EndingsLedger {
    /// Register every ending passage in the graph as not yet reached.
    pub fn from_graph(graph: &PassageGraph) -> Self {
        let entries = graph
            .endings()
            .map(|p| {
                let outcome = classify(&p.tags).map(|o| o.tag);
                (p.name.clone(), EndingRecord::unreached(outcome))
            })
            .collect::<LedgerState>();
        let story = entries.keys().cloned().collect();
        Self { entries, story }
    }

    /// Build the ledger for `graph` and merge in whatever `store` holds under `key`.
    pub fn hydrate(
        graph: &PassageGraph,
        store: &dyn LedgerStore,
        key: &str,
    ) -> LedgerResult<Self> {
        let mut ledger = Self::from_graph(graph);
        if let Some(json) = store.read(key)? {
            let state = record::decode_state(&json)?;
            tracing::info!(key, entries = state.len(), "loaded endings ledger");
            ledger.load(state);
        }
        Ok(ledger)
    }

    /// Merge a saved state into the ledger.
    pub fn load(&mut self, state: LedgerState) {
        for (name, saved) in state {
            self.entries.entry(name).or_default().merge(saved);
        }
    }

    /// Mark an ending reached. Idempotent.
    ///
    /// Names that were never registered are still recorded, with a warning,
    /// so content-authoring gaps show up without stopping play.
    pub fn mark_reached(&mut self, name: &str, outcome: Option<&str>) {
        if !self.entries.contains_key(name) {
            tracing::warn!(name, "ending reached that is not in the ledger schema");
        }
        let record = self.entries.entry(name.to_string()).or_default();

        if record.outcome.is_none() {
            record.outcome = outcome.map(str::to_string);
        }
        if !record.reached {
            record.reached = true;
            record.first_reached_at = Some(Utc::now());
            tracing::info!(name, "ending reached for the first time");
        }
    }

    /// Whether `name` has been reached.
    pub fn is_reached(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(|r| r.reached)
    }

    /// The record for `name`, if registered or reached.
    pub fn get(&self, name: &str) -> Option<&EndingRecord> {
        self.entries.get(name)
    }

    /// A copy of the ledger state for persistence.
    pub fn snapshot(&self) -> LedgerState {
        self.entries.clone()
    }

    /// Write the ledger to `store` under `key`.
    pub fn persist(&self, store: &mut dyn LedgerStore, key: &str) -> LedgerResult<()> {
        let json = record::encode_state(&self.entries)?;
        store.write(key, &json)?;
        tracing::debug!(key, "persisted endings ledger");
        Ok(())
    }

    /// Number of the story's endings that have been reached.
    pub fn reached_count(&self) -> usize {
        self.iter().filter(|(_, r)| r.reached).count()
    }

    /// Number of endings in the story.
    pub fn total(&self) -> usize {
        self.story.len()
    }

    /// Iterate the story's `(name, record)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EndingRecord)> {
        self.entries
            .iter()
            .filter(|(name, _)| self.story.contains(*name))
            .map(|(name, r)| (name.as_str(), r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vn_core::{Link, Passage, PassageId};

    fn graph() -> PassageGraph {
        PassageGraph::new(
            vec![
                Passage::new(1, "startnode", "")
                    .with_link(Link::new("a", "BadPath", 2))
                    .with_link(Link::new("b", "Ending-3", 3)),
                Passage::new(2, "BadPath", "You die.").with_tag("BAD-END"),
                Passage::new(3, "Ending-3", "The end.").with_tag("Good-End"),
            ],
            PassageId(1),
            PassageId(1),
        )
        .unwrap()
    }

    #[test]
    fn seeded_from_graph() {
        let ledger = EndingsLedger::from_graph(&graph());
        assert_eq!(ledger.total(), 2);
        assert_eq!(ledger.reached_count(), 0);
        assert_eq!(
            ledger.get("BadPath").unwrap().outcome.as_deref(),
            Some("BAD-END")
        );
        assert!(ledger.get("startnode").is_none());
    }

    #[test]
    fn mark_reached_is_idempotent() {
        let mut ledger = EndingsLedger::from_graph(&graph());
        ledger.mark_reached("Ending-3", Some("Good-End"));
        let first = ledger.get("Ending-3").unwrap().first_reached_at;

        ledger.mark_reached("Ending-3", Some("Good-End"));
        assert!(ledger.is_reached("Ending-3"));
        assert_eq!(ledger.reached_count(), 1);
        assert_eq!(ledger.get("Ending-3").unwrap().first_reached_at, first);
    }

    #[test]
    fn unknown_ending_is_recorded() {
        let mut ledger = EndingsLedger::from_graph(&graph());
        ledger.mark_reached("SecretRoom", None);
        assert!(ledger.is_reached("SecretRoom"));
        assert!(ledger.snapshot().contains_key("SecretRoom"));
        assert_eq!(ledger.total(), 2);
        assert_eq!(ledger.reached_count(), 0);
    }

    #[test]
    fn stale_saved_endings_do_not_inflate_counts() {
        let mut store = MemoryStore::new();
        store
            .write(
                "endings",
                r#"{"BadPath": true, "RemovedEnding": {"reached": true, "outcome": "EGG"}}"#,
            )
            .unwrap();

        let ledger = EndingsLedger::hydrate(&graph(), &store, "endings").unwrap();
        assert_eq!(ledger.total(), 2);
        assert_eq!(ledger.reached_count(), 1);
        assert_eq!(
            ledger.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["BadPath", "Ending-3"]
        );
        assert!(ledger.is_reached("RemovedEnding"));
        assert!(ledger.snapshot().contains_key("RemovedEnding"));
    }

    #[test]
    fn load_cannot_unset_reached() {
        let mut ledger = EndingsLedger::from_graph(&graph());
        ledger.mark_reached("BadPath", Some("BAD-END"));

        let mut stale = LedgerState::new();
        stale.insert("BadPath".to_string(), EndingRecord::unreached(None));
        ledger.load(stale);

        assert!(ledger.is_reached("BadPath"));
    }

    #[test]
    fn persist_and_hydrate() {
        let mut store = MemoryStore::new();
        let mut ledger = EndingsLedger::from_graph(&graph());
        ledger.mark_reached("BadPath", Some("BAD-END"));
        ledger.persist(&mut store, "endings").unwrap();

        let restored = EndingsLedger::hydrate(&graph(), &store, "endings").unwrap();
        assert!(restored.is_reached("BadPath"));
        assert!(!restored.is_reached("Ending-3"));
        assert_eq!(restored.total(), 2);
        assert_eq!(restored.snapshot(), ledger.snapshot());
    }

    #[test]
    fn hydrate_migrates_legacy_strings() {
        let mut store = MemoryStore::new();
        store
            .write("endings", r#"{ "BadPath": "BAD-END", "Retired": true }"#)
            .unwrap();

        let ledger = EndingsLedger::hydrate(&graph(), &store, "endings").unwrap();
        assert!(ledger.is_reached("BadPath"));
        assert!(ledger.is_reached("Retired"));
        assert!(!ledger.is_reached("Ending-3"));
    }

    #[test]
    fn hydrate_rejects_garbage() {
        let mut store = MemoryStore::new();
        store.write("endings", "[1, 2, 3]").unwrap();
        assert!(EndingsLedger::hydrate(&graph(), &store, "endings").is_err());
    }

    #[test]
    fn hydrate_with_empty_store() {
        let store = MemoryStore::new();
        let ledger = EndingsLedger::hydrate(&graph(), &store, "endings").unwrap();
        assert_eq!(ledger.total(), 2);
    }
}
