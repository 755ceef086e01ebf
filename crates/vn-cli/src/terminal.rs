//! A presentation adapter that renders scenes as plain terminal text.

use std::sync::Arc;

use async_trait::async_trait;
use colored::Colorize;
use vn_core::{PassageId, StartVariant};
use vn_engine::{
    AssetManifest, ChoiceItem, Input, PresentationAdapter, PresentationError, SceneId, UserChoice,
};

pub struct TerminalAdapter {
    assets: Arc<AssetManifest>,
    scene: Option<SceneId>,
    choices: Vec<ChoiceItem>,
}

impl TerminalAdapter {
    pub fn new(assets: Arc<AssetManifest>) -> Self {
        Self {
            assets,
            scene: None,
            choices: Vec::new(),
        }
    }

    /// Turn one line of input into something the engine understands,
    /// based on what is on screen right now.
    pub fn interpret(&self, line: &str) -> Input {
        let input = line.trim();
        if input.is_empty() {
            return Input::Skip;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
            return Input::Quit;
        }

        let command = input.to_ascii_lowercase();
        match self.scene {
            Some(SceneId::Splash) => match command.as_str() {
                "s" | "start" => start(StartVariant::Default),
                "a" => start(StartVariant::Alt),
                _ => match StartVariant::parse(&command) {
                    Some(variant) => start(variant),
                    None => self.reject(input, "type 's' to start or 'a' for the alternate start"),
                },
            },
            Some(SceneId::Prompts) => match self.choice_target(input) {
                Some(target_id) => Input::Choice(UserChoice::Passage { target_id }),
                None => self.reject(
                    input,
                    &format!("pick a choice between 1 and {}", self.choices.len()),
                ),
            },
            Some(SceneId::GameOver) => match command.as_str() {
                "r" | "restart" => Input::Choice(UserChoice::Restart),
                _ => self.reject(input, "type 'r' to play again"),
            },
            None => Input::Skip,
        }
    }

    fn choice_target(&self, input: &str) -> Option<PassageId> {
        let n: usize = input.parse().ok()?;
        let index = n.checked_sub(1)?;
        self.choices.get(index).map(|c| c.target_id)
    }

    fn reject(&self, input: &str, hint: &str) -> Input {
        println!("  {} {hint}", format!("'{input}'?").yellow());
        Input::Skip
    }
}

fn start(variant: StartVariant) -> Input {
    Input::Choice(UserChoice::Start { variant })
}

#[async_trait]
impl PresentationAdapter for TerminalAdapter {
    async fn initialize(&mut self) -> Result<(), PresentationError> {
        tracing::debug!(
            backgrounds = self.assets.backgrounds.len(),
            animations = self.assets.animations.len(),
            "terminal presentation ready"
        );
        Ok(())
    }

    fn show_background(&mut self, selector: &str) {
        match self.assets.backgrounds.get(selector) {
            Some(location) => println!("  {}", format!("[{selector}: {location}]").dimmed()),
            None => println!("  {}", format!("[{selector}]").dimmed()),
        }
    }

    fn play_character_animation(&mut self, selector: &str) {
        println!("  {}", format!("~ {selector}").dimmed());
    }

    fn set_secondary_effect(&mut self, enabled: bool) {
        if enabled {
            println!("  {}", "~ the air shimmers".dimmed());
        }
    }

    fn set_prompt_text(&mut self, text: &str) {
        println!();
        for line in text.lines() {
            println!("  {}", line.trim_end());
        }
    }

    fn set_choices(&mut self, choices: &[ChoiceItem]) {
        self.choices = choices.to_vec();
        if choices.is_empty() {
            return;
        }
        println!();
        for (i, choice) in choices.iter().enumerate() {
            println!("  {} {}", format!("{}.", i + 1).bold(), choice.label);
        }
    }

    fn show_ending_text(&mut self, text: &str) {
        println!();
        for line in text.lines() {
            println!("  {}", line.trim_end().red().bold());
        }
    }

    fn show_endings_progress(&mut self, reached: usize, total: usize) {
        println!("  Endings found: {reached}/{total}");
    }

    async fn enter_scene(&mut self, scene: SceneId) -> Result<(), PresentationError> {
        self.scene = Some(scene);
        match scene {
            SceneId::Splash => {
                println!("  {}", "A branching story".bold());
                println!("  Type 's' to start, 'a' for the alternate start, 'q' to quit.");
            }
            SceneId::Prompts => {}
            SceneId::GameOver => {
                println!();
                println!("  {}  Type 'r' to play again or 'q' to quit.", "THE END".bold());
            }
        }
        Ok(())
    }

    async fn exit_scene(&mut self, scene: SceneId) -> Result<(), PresentationError> {
        if self.scene == Some(scene) {
            self.scene = None;
        }
        Ok(())
    }
}
