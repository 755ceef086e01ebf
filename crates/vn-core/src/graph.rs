use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::error::{DanglingLink, StoryError, StoryResult};
use crate::outcome::classify;
use crate::passage::{Passage, PassageId, StartVariant};

/// The immutable story: passages addressed by dense 1-based ids.
///
/// Construction validates the whole graph up front, so a graph that exists
/// never contains a link to a missing passage.
#[derive(Debug, Clone)]
pub struct PassageGraph {
    passages: Vec<Passage>,
    start: PassageId,
    alt_start: PassageId,

    // Indexes
    by_name: HashMap<String, PassageId>,
}

impl PassageGraph {
    /// Build a graph, validating ids, start nodes, and every link target.
    pub fn new(
        mut passages: Vec<Passage>,
        start: PassageId,
        alt_start: PassageId,
    ) -> StoryResult<Self> {
        if passages.is_empty() {
            return Err(StoryError::Empty);
        }

        passages.sort_by_key(|p| p.id);
        for (index, passage) in passages.iter().enumerate() {
            let expected = PassageId(index as u32 + 1);
            if passage.id != expected {
                return Err(StoryError::NonDenseIds {
                    expected,
                    found: passage.id,
                });
            }
        }

        let len = passages.len();
        let in_range = |id: PassageId| id.index().is_some_and(|i| i < len);

        for id in [start, alt_start] {
            if !in_range(id) {
                return Err(StoryError::InvalidStart(id));
            }
        }

        let dangling: Vec<DanglingLink> = passages
            .iter()
            .flat_map(|p| {
                p.links
                    .iter()
                    .filter(|l| !in_range(l.target_id))
                    .map(|l| DanglingLink {
                        from: p.id,
                        label: l.label.clone(),
                        target_id: l.target_id,
                    })
            })
            .collect();
        if !dangling.is_empty() {
            return Err(StoryError::Integrity(dangling));
        }

        let mut by_name = HashMap::with_capacity(len);
        for passage in &passages {
            if by_name.insert(passage.name.clone(), passage.id).is_some() {
                tracing::warn!(name = %passage.name, "duplicate passage name; name lookups resolve to the last one");
            }
        }

        Ok(Self {
            passages,
            start,
            alt_start,
            by_name,
        })
    }

    /// Get a passage by id.
    pub fn get(&self, id: PassageId) -> StoryResult<&Passage> {
        id.index()
            .and_then(|i| self.passages.get(i))
            .ok_or(StoryError::NotFound(id))
    }

    /// Find a passage by its exact name.
    pub fn find_by_name(&self, name: &str) -> Option<&Passage> {
        self.by_name.get(name).and_then(|id| self.get(*id).ok())
    }

    /// The id of the requested start node.
    pub fn start(&self, variant: StartVariant) -> PassageId {
        match variant {
            StartVariant::Default => self.start,
            StartVariant::Alt => self.alt_start,
        }
    }

    /// Number of passages.
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    /// Always false for a constructed graph; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Iterate passages in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Passage> {
        self.passages.iter()
    }

    /// Passages whose tags classify as a terminal outcome.
    pub fn endings(&self) -> impl Iterator<Item = &Passage> {
        self.passages
            .iter()
            .filter(|p| classify(&p.tags).is_some_and(|o| o.is_ending()))
    }

    /// Ids reachable from `start` by following choices.
    ///
    /// Endings are reachable but not followed, since play leaves the story
    /// as soon as one is entered.
    pub fn reachable_from(&self, start: PassageId) -> BTreeSet<PassageId> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            let Ok(passage) = self.get(id) else {
                continue;
            };
            if !seen.insert(id) {
                continue;
            }
            if classify(&passage.tags).is_some_and(|o| o.is_ending()) {
                continue;
            }
            queue.extend(passage.links.iter().map(|l| l.target_id));
        }
        seen
    }
}
