//! The presentation adapter seam and the events it produces.
//!
//! The engine drives everything visual through [`PresentationAdapter`] and
//! receives input only as [`UserChoice`] events. Rendering, transitions,
//! sprites and audio all live on the other side of this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vn_core::{PassageId, StartVariant};

use crate::error::PresentationError;
use crate::scene::SceneId;

/// One selectable choice shown to the reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceItem {
    /// Text shown for the choice.
    pub label: String,
    /// Passage the choice leads to.
    pub target_id: PassageId,
}

/// Input from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserChoice {
    /// A passage choice during play.
    Passage {
        /// The chosen passage.
        target_id: PassageId,
    },
    /// Start the story from the splash screen.
    Start {
        /// Which start node to use.
        #[serde(default)]
        variant: StartVariant,
    },
    /// Play again from the game-over screen.
    Restart,
}

/// Everything the engine asks of the presentation layer.
///
/// Scene entry and exit are awaited: the engine does not continue until the
/// adapter acknowledges them. Everything else is fire-and-forget.
#[async_trait]
pub trait PresentationAdapter: Send {
    /// Prepare the presentation layer. Called once before the first scene.
    async fn initialize(&mut self) -> Result<(), PresentationError> {
        Ok(())
    }

    /// Show a background by selector key.
    fn show_background(&mut self, selector: &str);

    /// Play a character animation by selector key.
    fn play_character_animation(&mut self, selector: &str);

    /// Stop whatever character animation is playing.
    fn stop_character_animation(&mut self) {}

    /// Turn the secondary overlay effect on or off.
    fn set_secondary_effect(&mut self, enabled: bool);

    /// Replace the prompt text.
    fn set_prompt_text(&mut self, text: &str);

    /// Replace the choice list.
    fn set_choices(&mut self, choices: &[ChoiceItem]);

    /// Show the text of the ending that was reached.
    fn show_ending_text(&mut self, text: &str);

    /// Show how many endings have been reached out of how many are known.
    fn show_endings_progress(&mut self, _reached: usize, _total: usize) {}

    /// Bring a scene on screen. Resolves when the transition has finished.
    async fn enter_scene(&mut self, scene: SceneId) -> Result<(), PresentationError>;

    /// Take a scene off screen. Resolves when the transition has finished.
    async fn exit_scene(&mut self, scene: SceneId) -> Result<(), PresentationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_choice_wire_format() {
        let choice: UserChoice =
            serde_json::from_str(r#"{"action":"passage","target_id":2}"#).unwrap();
        assert_eq!(
            choice,
            UserChoice::Passage {
                target_id: PassageId(2)
            }
        );

        let start: UserChoice = serde_json::from_str(r#"{"action":"start"}"#).unwrap();
        assert_eq!(
            start,
            UserChoice::Start {
                variant: StartVariant::Default
            }
        );

        let alt: UserChoice =
            serde_json::from_str(r#"{"action":"start","variant":"alt"}"#).unwrap();
        assert_eq!(
            alt,
            UserChoice::Start {
                variant: StartVariant::Alt
            }
        );

        let restart: UserChoice = serde_json::from_str(r#"{"action":"restart"}"#).unwrap();
        assert_eq!(restart, UserChoice::Restart);
    }
}
