//! Narrative traversal engine for the visual novel runtime.
//!
//! Provides the scene state machine (splash, play, game over), the narrative
//! session that walks a passage graph and classifies outcomes, the endings
//! ledger that survives restarts, and the presentation adapter seam that
//! keeps all rendering outside the engine.

pub mod adapter;
pub mod assets;
pub mod config;
pub mod error;
pub mod ledger;
pub mod runtime;
pub mod scene;
pub mod session;
pub mod tally;
pub mod testing;

pub use adapter::{ChoiceItem, PresentationAdapter, UserChoice};
pub use assets::{AnimationCue, AnimationDirectory, AssetManifest};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult, LedgerError, PresentationError, StoreError};
pub use ledger::{EndingRecord, EndingsLedger, FileStore, LedgerState, LedgerStore, MemoryStore};
pub use runtime::{Input, run, run_with};
pub use scene::{Dispatch, Scene, SceneController, SceneId, SceneTarget};
pub use session::{EndingTransition, Frame, NarrativeSession, Step};
pub use tally::OutcomeTally;
