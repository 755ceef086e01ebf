//! Ending screen.

use vn_core::StartVariant;

use crate::adapter::{PresentationAdapter, UserChoice};
use crate::error::EngineResult;
use crate::ledger::LedgerStore;
use crate::session::EndingTransition;

use super::{Reaction, Scene, SceneId, SceneTarget, Stage};

pub(super) async fn enter<A: PresentationAdapter, S: LedgerStore>(
    stage: &mut Stage<A, S>,
    ending: EndingTransition,
) -> EngineResult<Scene> {
    let background = stage.background_for(&ending.passage_name, &ending.outcome_tag);
    let (reached, total) = (stage.ledger.reached_count(), stage.ledger.total());

    stage.adapter.show_background(&background);
    stage.adapter.show_ending_text(&ending.ending_text);
    stage.adapter.show_endings_progress(reached, total);
    stage.adapter.set_choices(&[]);
    stage.adapter.enter_scene(SceneId::GameOver).await?;

    tracing::info!(
        ending = %ending.passage_name,
        outcome = %ending.outcome_tag,
        reached,
        total,
        "game over"
    );
    Ok(Scene::GameOver(ending))
}

pub(super) async fn exit<A: PresentationAdapter, S: LedgerStore>(
    stage: &mut Stage<A, S>,
) -> EngineResult<()> {
    stage.adapter.exit_scene(SceneId::GameOver).await?;
    Ok(())
}

pub(super) fn handle_choice(choice: UserChoice) -> Reaction {
    match choice {
        UserChoice::Restart => Reaction::Switch(SceneTarget::Prompts(StartVariant::Default)),
        _ => Reaction::Ignored,
    }
}
