//! Narrative session: one walk through the passage graph.
//!
//! A session resolves passages, classifies them, keeps the per-session tally,
//! and marks endings in the ledger. It does not talk to the presentation layer
//! itself; every traversal returns a [`Step`] describing what should be shown,
//! and the scene controller applies it to the adapter.

use std::sync::Arc;

use vn_core::{OutcomeCategory, Passage, PassageGraph, PassageId, StartVariant, classify};

use crate::adapter::{ChoiceItem, PresentationAdapter};
use crate::assets::{AnimationCue, AssetManifest};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::ledger::EndingsLedger;
use crate::tally::OutcomeTally;

/// A normal in-story step: everything needed to render one passage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The passage being shown.
    pub passage_id: PassageId,
    /// Its name.
    pub passage_name: String,
    /// Outcome tag, when the passage had a recognized path marker.
    pub outcome_tag: Option<String>,
    /// Background selector key.
    pub background: String,
    /// Character animation and overlay.
    pub animation: AnimationCue,
    /// Displayable prompt text.
    pub prompt: String,
    /// Next choices in display order.
    pub choices: Vec<ChoiceItem>,
}

/// Request to leave play for the game-over scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndingTransition {
    /// The END marker that matched.
    pub outcome_tag: String,
    /// Prompt text of the ending passage.
    pub ending_text: String,
    /// Name of the ending passage.
    pub passage_name: String,
}

/// Result of one traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Render a passage and keep playing.
    Frame(Frame),
    /// A menu passage; nothing is rendered.
    Menu,
    /// An ending was reached.
    Ending(EndingTransition),
}

/// One playthrough: current position plus the outcome tally.
#[derive(Debug)]
pub struct NarrativeSession {
    graph: Arc<PassageGraph>,
    assets: Arc<AssetManifest>,
    config: EngineConfig,
    current: Option<PassageId>,
    tally: OutcomeTally,
}

impl NarrativeSession {
    /// Create a session over a shared graph. Call [`begin`](Self::begin) next.
    pub fn new(graph: Arc<PassageGraph>, assets: Arc<AssetManifest>, config: EngineConfig) -> Self {
        Self {
            graph,
            assets,
            config,
            current: None,
            tally: OutcomeTally::new(),
        }
    }

    /// The passage most recently shown, if the session has begun.
    pub fn current_passage(&self) -> Option<PassageId> {
        self.current
    }

    /// Outcome counts for this session.
    pub fn tally(&self) -> &OutcomeTally {
        &self.tally
    }

    /// Reset the tally and traverse the chosen start node.
    pub fn begin(&mut self, variant: StartVariant, ledger: &mut EndingsLedger) -> EngineResult<Step> {
        self.tally.reset();
        self.current = None;
        let start = self.graph.start(variant);
        tracing::debug!(%variant, %start, "session begins");
        self.traverse(start, ledger)
    }

    /// Follow a choice to `target`.
    pub fn choose(&mut self, target: PassageId, ledger: &mut EndingsLedger) -> EngineResult<Step> {
        if self.current.is_none() {
            return Err(EngineError::NotStarted);
        }
        self.traverse(target, ledger)
    }

    fn traverse(&mut self, id: PassageId, ledger: &mut EndingsLedger) -> EngineResult<Step> {
        let graph = Arc::clone(&self.graph);
        let passage = graph.get(id)?;
        let outcome = classify(&passage.tags);
        tracing::debug!(
            passage = %id,
            name = %passage.name,
            outcome = outcome.as_ref().map(|o| o.tag.as_str()).unwrap_or("none"),
            "traversing"
        );

        if let Some(outcome) = &outcome {
            self.tally.record(outcome);
        }

        match outcome {
            Some(outcome) if outcome.category == OutcomeCategory::End => {
                ledger.mark_reached(&passage.name, Some(&outcome.tag));
                Ok(Step::Ending(EndingTransition {
                    outcome_tag: outcome.tag,
                    ending_text: self.prompt_of(passage),
                    passage_name: passage.name.clone(),
                }))
            }
            Some(outcome) if outcome.category == OutcomeCategory::Menu => {
                self.current = Some(id);
                Ok(Step::Menu)
            }
            outcome => {
                let outcome_tag = outcome.map(|o| o.tag);
                let frame = self.frame_for(passage, outcome_tag);
                self.current = Some(id);
                Ok(Step::Frame(frame))
            }
        }
    }

    fn frame_for(&self, passage: &Passage, outcome_tag: Option<String>) -> Frame {
        let mut candidates = vec![passage.name.as_str()];
        if let Some(tag) = &outcome_tag {
            candidates.push(tag.as_str());
        }
        let background = self
            .assets
            .resolve_background(candidates, &self.config.default_background);

        Frame {
            passage_id: passage.id,
            passage_name: passage.name.clone(),
            background,
            animation: self
                .assets
                .resolve_animation(&passage.name, &self.config.default_animation),
            prompt: self.prompt_of(passage),
            choices: passage
                .links
                .iter()
                .map(|l| ChoiceItem {
                    label: l.label.clone(),
                    target_id: l.target_id,
                })
                .collect(),
            outcome_tag,
        }
    }

    fn prompt_of(&self, passage: &Passage) -> String {
        passage.prompt(&self.config.link_delimiter).to_string()
    }
}

/// Push a frame's directives to the adapter.
pub fn present_frame(adapter: &mut dyn PresentationAdapter, frame: &Frame) {
    adapter.show_background(&frame.background);
    adapter.play_character_animation(&frame.animation.animation);
    adapter.set_secondary_effect(frame.animation.secondary_effect);
    adapter.set_prompt_text(&frame.prompt);
    adapter.set_choices(&frame.choices);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AnimationDirectory;
    use vn_core::Link;

    fn graph() -> Arc<PassageGraph> {
        Arc::new(
            PassageGraph::new(
                vec![
                    Passage::new(1, "startnode", "Which way?[[Left]][[Right]]")
                        .with_link(Link::new("Left", "BadPath", 2))
                        .with_link(Link::new("Right", "Meadow", 3)),
                    Passage::new(2, "BadPath", "You die.[[...]]")
                        .with_tag("BAD-END")
                        .with_tag("GOOD"),
                    Passage::new(3, "Meadow", "Flowers.[[Back]][[Menu]]")
                        .with_tag("GOOD")
                        .with_link(Link::new("Back", "startnode", 1))
                        .with_link(Link::new("Menu", "Options", 4)),
                    Passage::new(4, "Options", "").with_tag("Menu-page"),
                    Passage::new(5, "Cave", "Dark.").with_tag("Neutral-Path"),
                ],
                PassageId(1),
                PassageId(5),
            )
            .unwrap(),
        )
    }

    fn session(assets: AssetManifest) -> (NarrativeSession, EndingsLedger) {
        let graph = graph();
        let ledger = EndingsLedger::from_graph(&graph);
        (
            NarrativeSession::new(graph, Arc::new(assets), EngineConfig::default()),
            ledger,
        )
    }

    fn expect_frame(step: Step) -> Frame {
        match step {
            Step::Frame(frame) => frame,
            other => panic!("expected frame, got {other:?}"),
        }
    }

    #[test]
    fn begin_shows_start_with_defaults() {
        let (mut session, mut ledger) = session(AssetManifest::new());
        let frame = expect_frame(session.begin(StartVariant::Default, &mut ledger).unwrap());

        assert_eq!(frame.passage_id, PassageId(1));
        assert_eq!(frame.background, "default");
        assert_eq!(frame.animation, AnimationCue::plain("default"));
        assert_eq!(frame.prompt, "Which way?");
        assert_eq!(frame.outcome_tag, None);
        assert_eq!(
            frame.choices,
            vec![
                ChoiceItem {
                    label: "Left".to_string(),
                    target_id: PassageId(2)
                },
                ChoiceItem {
                    label: "Right".to_string(),
                    target_id: PassageId(3)
                },
            ]
        );
        assert_eq!(session.current_passage(), Some(PassageId(1)));
        assert_eq!(ledger.reached_count(), 0);
    }

    #[test]
    fn alt_start() {
        let (mut session, mut ledger) = session(AssetManifest::new());
        let frame = expect_frame(session.begin(StartVariant::Alt, &mut ledger).unwrap());
        assert_eq!(frame.passage_name, "Cave");
        assert_eq!(session.tally().count("Neutral-Path"), 1);
    }

    #[test]
    fn ending_marks_ledger_and_keeps_position() {
        let (mut session, mut ledger) = session(AssetManifest::new());
        session.begin(StartVariant::Default, &mut ledger).unwrap();

        let step = session.choose(PassageId(2), &mut ledger).unwrap();
        assert_eq!(
            step,
            Step::Ending(EndingTransition {
                outcome_tag: "BAD-END".to_string(),
                ending_text: "You die.".to_string(),
                passage_name: "BadPath".to_string(),
            })
        );
        assert!(ledger.is_reached("BadPath"));
        assert_eq!(session.tally().count("BAD-END"), 1);
        assert_eq!(session.tally().count("GOOD"), 0);
        assert_eq!(session.current_passage(), Some(PassageId(1)));
    }

    #[test]
    fn path_background_prefers_name_then_tag() {
        let assets = AssetManifest::new().with_background("GOOD", "bg/good.png");
        let (mut session, mut ledger) = session(assets);
        session.begin(StartVariant::Default, &mut ledger).unwrap();
        let frame = expect_frame(session.choose(PassageId(3), &mut ledger).unwrap());
        assert_eq!(frame.background, "GOOD");
        assert_eq!(frame.outcome_tag.as_deref(), Some("GOOD"));

        let assets = AssetManifest::new()
            .with_background("GOOD", "bg/good.png")
            .with_background("Meadow", "bg/meadow.png");
        let (mut session, mut ledger) = self::session(assets);
        session.begin(StartVariant::Default, &mut ledger).unwrap();
        let frame = expect_frame(session.choose(PassageId(3), &mut ledger).unwrap());
        assert_eq!(frame.background, "Meadow");
    }

    #[test]
    fn animation_directory_entry_is_used() {
        let assets = AssetManifest::new().with_animations(
            AnimationDirectory::new().with_entry(
                "Meadow",
                AnimationCue {
                    animation: "smile".to_string(),
                    secondary_effect: true,
                },
            ),
        );
        let (mut session, mut ledger) = session(assets);
        session.begin(StartVariant::Default, &mut ledger).unwrap();
        let frame = expect_frame(session.choose(PassageId(3), &mut ledger).unwrap());
        assert_eq!(frame.animation.animation, "smile");
        assert!(frame.animation.secondary_effect);
    }

    #[test]
    fn configured_defaults_fill_gaps() {
        let graph = graph();
        let mut ledger = EndingsLedger::from_graph(&graph);
        let config = EngineConfig::default()
            .with_default_animation("idle")
            .with_default_background("black");
        let mut session = NarrativeSession::new(graph, Arc::new(AssetManifest::new()), config);

        let frame = expect_frame(session.begin(StartVariant::Default, &mut ledger).unwrap());
        assert_eq!(frame.animation, AnimationCue::plain("idle"));
        assert_eq!(frame.background, "black");
    }

    #[test]
    fn menu_is_a_no_op_that_moves_position() {
        let (mut session, mut ledger) = session(AssetManifest::new());
        session.begin(StartVariant::Default, &mut ledger).unwrap();
        assert_eq!(session.choose(PassageId(4), &mut ledger).unwrap(), Step::Menu);
        assert_eq!(session.current_passage(), Some(PassageId(4)));
        assert_eq!(session.tally().total(), 0);
    }

    #[test]
    fn repeat_visits_are_tallied() {
        let (mut session, mut ledger) = session(AssetManifest::new());
        session.begin(StartVariant::Default, &mut ledger).unwrap();
        session.choose(PassageId(3), &mut ledger).unwrap();
        session.choose(PassageId(1), &mut ledger).unwrap();
        session.choose(PassageId(3), &mut ledger).unwrap();
        assert_eq!(session.tally().count("GOOD"), 2);
    }

    #[test]
    fn unknown_target_is_fatal() {
        let (mut session, mut ledger) = session(AssetManifest::new());
        session.begin(StartVariant::Default, &mut ledger).unwrap();
        let err = session.choose(PassageId(99), &mut ledger).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Story(vn_core::StoryError::NotFound(PassageId(99)))
        ));
        assert_eq!(session.current_passage(), Some(PassageId(1)));
    }

    #[test]
    fn choose_before_begin() {
        let (mut session, mut ledger) = session(AssetManifest::new());
        assert!(matches!(
            session.choose(PassageId(1), &mut ledger),
            Err(EngineError::NotStarted)
        ));
    }

    #[test]
    fn begin_resets_tally() {
        let (mut session, mut ledger) = session(AssetManifest::new());
        session.begin(StartVariant::Default, &mut ledger).unwrap();
        session.choose(PassageId(3), &mut ledger).unwrap();
        assert_eq!(session.tally().count("GOOD"), 1);

        session.begin(StartVariant::Default, &mut ledger).unwrap();
        assert_eq!(session.tally().total(), 0);
    }
}
