//! A presentation adapter that records what it is told, for tests and
//! headless runs.

use async_trait::async_trait;

use crate::adapter::{ChoiceItem, PresentationAdapter};
use crate::error::PresentationError;
use crate::scene::SceneId;

/// One call made on a [`RecordingAdapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `initialize`
    Initialize,
    /// `show_background`
    Background(String),
    /// `play_character_animation`
    Animation(String),
    /// `stop_character_animation`
    StopAnimation,
    /// `set_secondary_effect`
    SecondaryEffect(bool),
    /// `set_prompt_text`
    Prompt(String),
    /// `set_choices`
    Choices(Vec<ChoiceItem>),
    /// `show_ending_text`
    EndingText(String),
    /// `show_endings_progress`
    EndingsProgress {
        /// Endings reached.
        reached: usize,
        /// Endings known.
        total: usize,
    },
    /// `enter_scene`
    EnterScene(SceneId),
    /// `exit_scene`
    ExitScene(SceneId),
}

/// Records every directive in order. Scene transitions acknowledge
/// immediately unless configured to fail.
#[derive(Debug, Default)]
pub struct RecordingAdapter {
    /// Everything received so far.
    pub directives: Vec<Directive>,
    fail_on: Option<SceneId>,
}

impl RecordingAdapter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `enter_scene` fail for the given scene.
    pub fn failing_on(mut self, scene: SceneId) -> Self {
        self.fail_on = Some(scene);
        self
    }

    /// Take and clear the recorded directives.
    pub fn take(&mut self) -> Vec<Directive> {
        std::mem::take(&mut self.directives)
    }

    /// Only the scene enter/exit directives.
    pub fn scene_events(&self) -> Vec<Directive> {
        self.directives
            .iter()
            .filter(|d| matches!(d, Directive::EnterScene(_) | Directive::ExitScene(_)))
            .cloned()
            .collect()
    }

    /// The most recent background selector.
    pub fn last_background(&self) -> Option<&str> {
        self.directives.iter().rev().find_map(|d| match d {
            Directive::Background(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// The most recent prompt text.
    pub fn last_prompt(&self) -> Option<&str> {
        self.directives.iter().rev().find_map(|d| match d {
            Directive::Prompt(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// The most recent choice list.
    pub fn last_choices(&self) -> Option<&[ChoiceItem]> {
        self.directives.iter().rev().find_map(|d| match d {
            Directive::Choices(c) => Some(c.as_slice()),
            _ => None,
        })
    }
}

#[async_trait]
impl PresentationAdapter for RecordingAdapter {
    async fn initialize(&mut self) -> Result<(), PresentationError> {
        self.directives.push(Directive::Initialize);
        Ok(())
    }

    fn show_background(&mut self, selector: &str) {
        self.directives.push(Directive::Background(selector.to_string()));
    }

    fn play_character_animation(&mut self, selector: &str) {
        self.directives.push(Directive::Animation(selector.to_string()));
    }

    fn stop_character_animation(&mut self) {
        self.directives.push(Directive::StopAnimation);
    }

    fn set_secondary_effect(&mut self, enabled: bool) {
        self.directives.push(Directive::SecondaryEffect(enabled));
    }

    fn set_prompt_text(&mut self, text: &str) {
        self.directives.push(Directive::Prompt(text.to_string()));
    }

    fn set_choices(&mut self, choices: &[ChoiceItem]) {
        self.directives.push(Directive::Choices(choices.to_vec()));
    }

    fn show_ending_text(&mut self, text: &str) {
        self.directives.push(Directive::EndingText(text.to_string()));
    }

    fn show_endings_progress(&mut self, reached: usize, total: usize) {
        self.directives
            .push(Directive::EndingsProgress { reached, total });
    }

    async fn enter_scene(&mut self, scene: SceneId) -> Result<(), PresentationError> {
        if self.fail_on == Some(scene) {
            return Err(PresentationError(format!("{scene} failed to enter")));
        }
        self.directives.push(Directive::EnterScene(scene));
        Ok(())
    }

    async fn exit_scene(&mut self, scene: SceneId) -> Result<(), PresentationError> {
        self.directives.push(Directive::ExitScene(scene));
        Ok(())
    }
}
