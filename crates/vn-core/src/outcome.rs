//! Tag-based outcome classification.
//!
//! A passage's tags are checked against a fixed priority list of markers. The
//! first marker present wins, so a passage carrying several markers always
//! classifies the same way no matter how its tags are stored.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// What a classified passage means for the flow of play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeCategory {
    /// Play continues; the passage is shown as a normal step.
    Path,
    /// Terminal passage; play moves to the game-over scene.
    End,
    /// Menu placeholder; nothing is rendered.
    Menu,
}

impl fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "PATH"),
            Self::End => write!(f, "END"),
            Self::Menu => write!(f, "MENU"),
        }
    }
}

/// Classification result for a passage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    /// The marker tag that matched.
    pub tag: String,
    /// The category the marker maps to.
    pub category: OutcomeCategory,
}

impl Outcome {
    /// Whether this outcome counts toward a session's tally.
    pub fn is_tallied(&self) -> bool {
        self.category != OutcomeCategory::Menu
    }

    /// Whether this outcome ends the story.
    pub fn is_ending(&self) -> bool {
        self.category == OutcomeCategory::End
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.tag, self.category)
    }
}

/// Recognized markers, highest priority first.
pub const PRIORITY: [(&str, OutcomeCategory); 7] = [
    ("BAD-END", OutcomeCategory::End),
    ("Good-End", OutcomeCategory::End),
    ("Neutral-End", OutcomeCategory::End),
    ("Neutral-Path", OutcomeCategory::Path),
    ("GOOD", OutcomeCategory::Path),
    ("EGG", OutcomeCategory::End),
    ("Menu-page", OutcomeCategory::Menu),
];

/// Classify a tag set. Returns `None` when no recognized marker is present.
pub fn classify(tags: &BTreeSet<String>) -> Option<Outcome> {
    PRIORITY
        .iter()
        .find(|(marker, _)| tags.contains(*marker))
        .map(|(marker, category)| Outcome {
            tag: (*marker).to_string(),
            category: *category,
        })
}
