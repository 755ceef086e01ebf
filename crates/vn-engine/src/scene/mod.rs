//! Scene controller: the top-level state machine over Splash, Prompts and
//! GameOver.
//!
//! Exactly one scene is active at a time. A transition awaits the outgoing
//! scene's exit before entering the next one, and the next scene only becomes
//! active once its entry has been acknowledged. User input is routed through
//! [`SceneController::dispatch`] to the active scene alone; input that arrives
//! while no scene is active, or that the active scene does not accept, is
//! dropped.

mod game_over;
mod prompts;
mod splash;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vn_core::{PassageGraph, StartVariant};

use crate::adapter::{PresentationAdapter, UserChoice};
use crate::assets::AssetManifest;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::ledger::{EndingsLedger, LedgerStore};
use crate::session::{EndingTransition, NarrativeSession};

/// Identifies a scene without its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneId {
    /// Start screen.
    Splash,
    /// In-story play.
    Prompts,
    /// Ending screen.
    GameOver,
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Splash => write!(f, "splash"),
            Self::Prompts => write!(f, "prompts"),
            Self::GameOver => write!(f, "game-over"),
        }
    }
}

/// A requested scene, with whatever it needs to be entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneTarget {
    /// Go to the start screen.
    Splash,
    /// Start a fresh session from the given start node.
    Prompts(StartVariant),
    /// Show the ending that was reached.
    GameOver(EndingTransition),
}

impl SceneTarget {
    /// The scene this target enters.
    pub fn id(&self) -> SceneId {
        match self {
            Self::Splash => SceneId::Splash,
            Self::Prompts(_) => SceneId::Prompts,
            Self::GameOver(_) => SceneId::GameOver,
        }
    }
}

/// An active scene and the state it owns.
#[derive(Debug)]
pub enum Scene {
    /// Start screen.
    Splash,
    /// In-story play, owning the live session.
    Prompts(NarrativeSession),
    /// Ending screen for the given ending.
    GameOver(EndingTransition),
}

impl Scene {
    /// The id of this scene.
    pub fn id(&self) -> SceneId {
        match self {
            Self::Splash => SceneId::Splash,
            Self::Prompts(_) => SceneId::Prompts,
            Self::GameOver(_) => SceneId::GameOver,
        }
    }
}

/// What happened to a dispatched event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The active scene handled it and stayed active.
    Handled,
    /// The event caused a scene transition, which has completed.
    Transitioned,
    /// Nobody accepted the event; it was dropped.
    Ignored,
}

/// A scene handler's verdict on an event.
enum Reaction {
    Ignored,
    Stay,
    Switch(SceneTarget),
}

/// Everything scenes share: the adapter, the ledger and its store, and the
/// read-only story data.
struct Stage<A, S> {
    adapter: A,
    store: S,
    graph: Arc<PassageGraph>,
    assets: Arc<AssetManifest>,
    config: EngineConfig,
    ledger: EndingsLedger,
}

impl<A: PresentationAdapter, S: LedgerStore> Stage<A, S> {
    /// Background for a screen tied to a passage: passage name, then outcome
    /// tag, then the configured default.
    fn background_for(&self, passage_name: &str, outcome_tag: &str) -> String {
        self.assets.resolve_background(
            [passage_name, outcome_tag],
            &self.config.default_background,
        )
    }

    /// Write the ledger out. Failures are reported, never retried.
    fn persist_ledger(&mut self) {
        if let Err(e) = self.ledger.persist(&mut self.store, &self.config.ledger_key) {
            tracing::error!(error = %e, key = %self.config.ledger_key, "failed to persist endings ledger");
        }
    }
}

/// The top-level state machine. Owns the presentation adapter, the ledger and
/// its store, and whichever scene is active.
pub struct SceneController<A, S> {
    stage: Stage<A, S>,
    active: Option<Scene>,
}

impl<A: PresentationAdapter, S: LedgerStore> SceneController<A, S> {
    /// Create a controller with an already-loaded ledger. No scene is active
    /// until [`start`](Self::start).
    pub fn new(
        graph: Arc<PassageGraph>,
        assets: Arc<AssetManifest>,
        ledger: EndingsLedger,
        adapter: A,
        store: S,
        config: EngineConfig,
    ) -> Self {
        Self {
            stage: Stage {
                adapter,
                store,
                graph,
                assets,
                config,
                ledger,
            },
            active: None,
        }
    }

    /// Create a controller, hydrating the ledger from `store`.
    pub fn hydrated(
        graph: Arc<PassageGraph>,
        assets: Arc<AssetManifest>,
        adapter: A,
        store: S,
        config: EngineConfig,
    ) -> EngineResult<Self> {
        let ledger = EndingsLedger::hydrate(&graph, &store, &config.ledger_key)?;
        Ok(Self::new(graph, assets, ledger, adapter, store, config))
    }

    /// Initialize the adapter and enter the splash scene.
    pub async fn start(&mut self) -> EngineResult<()> {
        self.stage.adapter.initialize().await?;
        self.switch_scene(SceneTarget::Splash).await
    }

    /// Id of the active scene, or `None` before start or after a failed transition.
    pub fn active_scene(&self) -> Option<SceneId> {
        self.active.as_ref().map(Scene::id)
    }

    /// The live session, while in Prompts.
    pub fn session(&self) -> Option<&NarrativeSession> {
        match &self.active {
            Some(Scene::Prompts(session)) => Some(session),
            _ => None,
        }
    }

    /// The endings ledger.
    pub fn ledger(&self) -> &EndingsLedger {
        &self.stage.ledger
    }

    /// The presentation adapter.
    pub fn adapter(&self) -> &A {
        &self.stage.adapter
    }

    /// The presentation adapter, mutably.
    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.stage.adapter
    }

    /// The ledger store.
    pub fn store(&self) -> &S {
        &self.stage.store
    }

    /// Move to `target`. A no-op if that scene is already active.
    ///
    /// If entering the new scene immediately calls for another transition
    /// (a start passage that is itself an ending), that one runs too.
    pub async fn switch_scene(&mut self, target: SceneTarget) -> EngineResult<()> {
        let mut next = Some(target);
        while let Some(target) = next.take() {
            if self.active_scene() == Some(target.id()) {
                tracing::debug!(scene = %target.id(), "already active; ignoring switch");
                break;
            }

            if let Some(outgoing) = self.active.take() {
                let id = outgoing.id();
                tracing::info!(scene = %id, "exiting scene");
                self.exit(outgoing).await?;
            }

            let id = target.id();
            tracing::info!(scene = %id, "entering scene");
            let (scene, follow_up) = self.enter(target).await?;
            self.active = Some(scene);
            next = follow_up;
        }
        Ok(())
    }

    /// Route a user choice to the active scene.
    pub async fn dispatch(&mut self, choice: UserChoice) -> EngineResult<Dispatch> {
        let Some(scene) = self.active.as_mut() else {
            tracing::debug!(?choice, "no active scene; dropping event");
            return Ok(Dispatch::Ignored);
        };

        let reaction = match scene {
            Scene::Splash => splash::handle_choice(choice),
            Scene::Prompts(session) => prompts::handle_choice(&mut self.stage, session, choice)?,
            Scene::GameOver(_) => game_over::handle_choice(choice),
        };

        match reaction {
            Reaction::Ignored => {
                tracing::debug!(?choice, scene = %scene_id(&self.active), "event not accepted by active scene");
                Ok(Dispatch::Ignored)
            }
            Reaction::Stay => Ok(Dispatch::Handled),
            Reaction::Switch(target) => {
                self.switch_scene(target).await?;
                Ok(Dispatch::Transitioned)
            }
        }
    }

    async fn enter(&mut self, target: SceneTarget) -> EngineResult<(Scene, Option<SceneTarget>)> {
        match target {
            SceneTarget::Splash => Ok((splash::enter(&mut self.stage).await?, None)),
            SceneTarget::Prompts(variant) => prompts::enter(&mut self.stage, variant).await,
            SceneTarget::GameOver(ending) => {
                Ok((game_over::enter(&mut self.stage, ending).await?, None))
            }
        }
    }

    async fn exit(&mut self, scene: Scene) -> EngineResult<()> {
        match scene {
            Scene::Splash => splash::exit(&mut self.stage).await,
            Scene::Prompts(session) => prompts::exit(&mut self.stage, session).await,
            Scene::GameOver(_) => game_over::exit(&mut self.stage).await,
        }
    }
}

fn scene_id(active: &Option<Scene>) -> String {
    active
        .as_ref()
        .map(|s| s.id().to_string())
        .unwrap_or_else(|| "none".to_string())
}
