use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Default substring that separates a passage's prompt from its link markup.
pub const LINK_DELIMITER: &str = "[[";

/// Identifier of a passage: 1-based and dense across a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassageId(pub u32);

impl PassageId {
    /// Zero-based position of this passage in a dense graph, if the id is valid.
    pub fn index(self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }
}

impl fmt::Display for PassageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PassageId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// An outgoing choice from a passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Text shown to the reader for this choice.
    pub label: String,
    /// Name of the passage this link leads to.
    pub target_name: String,
    /// Id of the passage this link leads to.
    pub target_id: PassageId,
}

impl Link {
    /// Create a link.
    pub fn new(
        label: impl Into<String>,
        target_name: impl Into<String>,
        target_id: impl Into<PassageId>,
    ) -> Self {
        Self {
            label: label.into(),
            target_name: target_name.into(),
            target_id: target_id.into(),
        }
    }
}

/// One narrative unit: a paragraph, its classification tags, and its choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    /// Position in the graph, starting at 1.
    pub id: PassageId,
    /// Human-readable name, also used as a lookup key for assets and endings.
    pub name: String,
    /// Raw text, including any trailing link markup.
    pub text: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Outgoing choices in display order.
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Passage {
    /// Create a passage with no tags or links.
    pub fn new(id: impl Into<PassageId>, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            text: text.into(),
            tags: BTreeSet::new(),
            links: Vec::new(),
        }
    }

    /// Add a tag (builder style).
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Add a link (builder style).
    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// The displayable part of the text: everything before the first `delimiter`.
    pub fn prompt(&self, delimiter: &str) -> &str {
        if delimiter.is_empty() {
            return &self.text;
        }
        match self.text.find(delimiter) {
            Some(pos) => &self.text[..pos],
            None => &self.text,
        }
    }
}

/// Which of the graph's two designated start nodes a session begins from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartVariant {
    /// The story's regular start node.
    #[default]
    Default,
    /// The alternate start node.
    Alt,
}

impl StartVariant {
    /// Parse a variant name (`default` or `alt`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "default" | "" => Some(Self::Default),
            "alt" | "alternate" => Some(Self::Alt),
            _ => None,
        }
    }
}

impl fmt::Display for StartVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Alt => write!(f, "alt"),
        }
    }
}
