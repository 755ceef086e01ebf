//! Error types for the narrative engine.

use thiserror::Error;
use vn_core::StoryError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors that can occur while running the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Story data defect, such as a choice pointing at a missing passage.
    #[error("{0}")]
    Story(#[from] StoryError),

    /// The presentation layer failed to acknowledge a scene change.
    #[error("presentation error: {0}")]
    Presentation(#[from] PresentationError),

    /// The endings ledger could not be loaded.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// A choice was made before the session began.
    #[error("session has not begun")]
    NotStarted,
}

/// A failure reported by the presentation adapter.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct PresentationError(pub String);

/// Errors from reading or writing the endings ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The backing store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Saved ledger data could not be decoded.
    #[error("corrupt ledger data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors from a ledger store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The store key is not usable as a file name.
    #[error("invalid store key: \"{0}\"")]
    InvalidKey(String),
}
