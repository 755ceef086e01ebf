//! Core types for the visual novel runtime: passages, the passage graph, and
//! tag-based outcome classification.
//!
//! This crate is pure data plus validation. Story files are loaded through
//! [`twine`], or a [`PassageGraph`] can be built programmatically. Nothing here
//! knows about scenes or presentation.

/// Error types used throughout the crate.
pub mod error;
/// The validated, read-only passage graph.
pub mod graph;
pub mod outcome;
/// Passages, links, and identifiers.
pub mod passage;
pub mod twine;

/// Re-export error types.
pub use error::{DanglingLink, StoryError, StoryResult};
/// Re-export the graph.
pub use graph::PassageGraph;
/// Re-export outcome classification.
pub use outcome::{Outcome, OutcomeCategory, classify};
/// Re-export passage types.
pub use passage::{LINK_DELIMITER, Link, Passage, PassageId, StartVariant};
