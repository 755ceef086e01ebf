//! In-story play.

use vn_core::StartVariant;

use crate::adapter::{PresentationAdapter, UserChoice};
use crate::error::EngineResult;
use crate::ledger::LedgerStore;
use crate::session::{NarrativeSession, Step, present_frame};

use super::{Reaction, Scene, SceneId, SceneTarget, Stage};

pub(super) async fn enter<A: PresentationAdapter, S: LedgerStore>(
    stage: &mut Stage<A, S>,
    variant: StartVariant,
) -> EngineResult<(Scene, Option<SceneTarget>)> {
    stage.adapter.enter_scene(SceneId::Prompts).await?;

    let mut session = NarrativeSession::new(
        stage.graph.clone(),
        stage.assets.clone(),
        stage.config.clone(),
    );
    let step = session.begin(variant, &mut stage.ledger)?;
    let follow_up = match apply(stage, step) {
        Reaction::Switch(target) => Some(target),
        Reaction::Stay | Reaction::Ignored => None,
    };
    Ok((Scene::Prompts(session), follow_up))
}

pub(super) async fn exit<A: PresentationAdapter, S: LedgerStore>(
    stage: &mut Stage<A, S>,
    session: NarrativeSession,
) -> EngineResult<()> {
    tracing::debug!(tally = ?session.tally(), "session ended");
    stage.adapter.stop_character_animation();
    stage.adapter.set_secondary_effect(false);
    stage.adapter.set_choices(&[]);
    stage.adapter.exit_scene(SceneId::Prompts).await?;
    Ok(())
}

pub(super) fn handle_choice<A: PresentationAdapter, S: LedgerStore>(
    stage: &mut Stage<A, S>,
    session: &mut NarrativeSession,
    choice: UserChoice,
) -> EngineResult<Reaction> {
    match choice {
        UserChoice::Passage { target_id } => {
            let step = session.choose(target_id, &mut stage.ledger)?;
            Ok(apply(stage, step))
        }
        _ => Ok(Reaction::Ignored),
    }
}

/// Render a step, or turn an ending into a transition.
fn apply<A: PresentationAdapter, S: LedgerStore>(stage: &mut Stage<A, S>, step: Step) -> Reaction {
    match step {
        Step::Frame(frame) => {
            present_frame(&mut stage.adapter, &frame);
            Reaction::Stay
        }
        // Placeholder for menu handling: nothing is shown.
        Step::Menu => Reaction::Stay,
        Step::Ending(ending) => {
            stage.persist_ledger();
            Reaction::Switch(SceneTarget::GameOver(ending))
        }
    }
}
