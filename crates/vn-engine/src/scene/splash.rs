//! Start screen.

use crate::adapter::{PresentationAdapter, UserChoice};
use crate::error::EngineResult;
use crate::ledger::LedgerStore;

use super::{Reaction, Scene, SceneId, SceneTarget, Stage};

pub(super) async fn enter<A: PresentationAdapter, S: LedgerStore>(
    stage: &mut Stage<A, S>,
) -> EngineResult<Scene> {
    let background = stage.config.default_background.clone();
    stage.adapter.show_background(&background);
    stage.adapter.enter_scene(SceneId::Splash).await?;
    Ok(Scene::Splash)
}

pub(super) async fn exit<A: PresentationAdapter, S: LedgerStore>(
    stage: &mut Stage<A, S>,
) -> EngineResult<()> {
    stage.adapter.exit_scene(SceneId::Splash).await?;
    Ok(())
}

pub(super) fn handle_choice(choice: UserChoice) -> Reaction {
    match choice {
        UserChoice::Start { variant } => Reaction::Switch(SceneTarget::Prompts(variant)),
        _ => Reaction::Ignored,
    }
}
