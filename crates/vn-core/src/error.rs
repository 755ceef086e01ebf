use std::fmt;

use crate::passage::PassageId;

/// Alias for `Result<T, StoryError>`.
pub type StoryResult<T> = Result<T, StoryError>;

/// A link whose target does not resolve to a passage in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingLink {
    /// The passage the link belongs to.
    pub from: PassageId,
    /// The link's display label.
    pub label: String,
    /// The unresolved target id.
    pub target_id: PassageId,
}

impl fmt::Display for DanglingLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "passage {} -> {} (\"{}\")",
            self.from, self.target_id, self.label
        )
    }
}

/// Errors that can occur when building or reading a passage graph.
#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    /// The requested passage id is outside the graph's `1..=N` range.
    #[error("passage not found: {0}")]
    NotFound(PassageId),

    /// One or more links point at passages that do not exist.
    #[error("dangling links: {}", format_links(.0))]
    Integrity(Vec<DanglingLink>),

    /// Passage ids are not a dense `1..=N` sequence.
    #[error("passage ids must be dense from 1: expected {expected}, found {found}")]
    NonDenseIds {
        /// The id expected at this position.
        expected: PassageId,
        /// The id actually found there.
        found: PassageId,
    },

    /// The graph has no passages.
    #[error("story has no passages")]
    Empty,

    /// A designated start node is outside the graph.
    #[error("start passage {0} does not exist")]
    InvalidStart(PassageId),

    /// A passage id in story data could not be parsed.
    #[error("invalid passage id: \"{0}\"")]
    InvalidPid(String),

    /// Story data is not valid JSON for the expected schema.
    #[error("malformed story data: {0}")]
    Parse(#[from] serde_json::Error),
}

fn format_links(links: &[DanglingLink]) -> String {
    links
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
