//! The event loop: feeds user choices to the scene controller one at a time.

use tokio::sync::mpsc;

use crate::adapter::{PresentationAdapter, UserChoice};
use crate::error::EngineResult;
use crate::ledger::LedgerStore;
use crate::scene::{Dispatch, SceneController};

/// What a raw input event means to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Dispatch this choice.
    Choice(UserChoice),
    /// Nothing to do.
    Skip,
    /// Stop the loop.
    Quit,
}

/// Process choices until the sender side closes.
///
/// Events are handled strictly in order. Whatever is still queued when a
/// scene transition finishes was sent during the transition and is dropped.
pub async fn run<A, S>(
    controller: &mut SceneController<A, S>,
    events: &mut mpsc::Receiver<UserChoice>,
) -> EngineResult<()>
where
    A: PresentationAdapter,
    S: LedgerStore,
{
    run_with(controller, events, |_, choice| Input::Choice(choice)).await
}

/// Like [`run`], for raw events that need translating first.
///
/// `translate` sees the adapter as it is when the event is dequeued, so it
/// can resolve input against what is currently on screen.
pub async fn run_with<A, S, E, F>(
    controller: &mut SceneController<A, S>,
    events: &mut mpsc::Receiver<E>,
    mut translate: F,
) -> EngineResult<()>
where
    A: PresentationAdapter,
    S: LedgerStore,
    F: FnMut(&A, E) -> Input,
{
    while let Some(event) = events.recv().await {
        let choice = match translate(controller.adapter(), event) {
            Input::Choice(choice) => choice,
            Input::Skip => continue,
            Input::Quit => break,
        };
        if controller.dispatch(choice).await? == Dispatch::Transitioned {
            let dropped = drain(events);
            if dropped > 0 {
                tracing::debug!(dropped, "dropped events received during scene transition");
            }
        }
    }
    tracing::debug!("event loop finished");
    Ok(())
}

fn drain<E>(events: &mut mpsc::Receiver<E>) -> usize {
    let mut dropped = 0;
    while events.try_recv().is_ok() {
        dropped += 1;
    }
    dropped
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::assets::AssetManifest;
    use crate::config::EngineConfig;
    use crate::ledger::{EndingsLedger, MemoryStore};
    use crate::scene::SceneId;
    use crate::testing::RecordingAdapter;
    use vn_core::{Link, Passage, PassageGraph, PassageId, StartVariant};

    fn controller() -> SceneController<RecordingAdapter, MemoryStore> {
        let graph = Arc::new(
            PassageGraph::new(
                vec![
                    Passage::new(1, "startnode", "Go?")
                        .with_link(Link::new("Die", "BadPath", 2))
                        .with_link(Link::new("Stay", "startnode", 1)),
                    Passage::new(2, "BadPath", "You die.").with_tag("BAD-END"),
                ],
                PassageId(1),
                PassageId(1),
            )
            .unwrap(),
        );
        let ledger = EndingsLedger::from_graph(&graph);
        SceneController::new(
            graph,
            Arc::new(AssetManifest::new()),
            ledger,
            RecordingAdapter::new(),
            MemoryStore::new(),
            EngineConfig::default(),
        )
    }

    #[tokio::test]
    async fn drops_events_queued_behind_a_transition() {
        let mut c = controller();
        c.start().await.unwrap();

        let (tx, mut rx) = mpsc::channel(16);
        tx.send(UserChoice::Start {
            variant: StartVariant::Default,
        })
        .await
        .unwrap();
        // Queued while the Splash -> Prompts transition is pending.
        tx.send(UserChoice::Passage {
            target_id: PassageId(2),
        })
        .await
        .unwrap();
        drop(tx);

        run(&mut c, &mut rx).await.unwrap();
        assert_eq!(c.active_scene(), Some(SceneId::Prompts));
        assert!(!c.ledger().is_reached("BadPath"));
    }

    #[tokio::test]
    async fn handles_events_in_order_within_a_scene() {
        let mut c = controller();
        c.start().await.unwrap();
        c.dispatch(UserChoice::Start {
            variant: StartVariant::Default,
        })
        .await
        .unwrap();

        let (tx, mut rx) = mpsc::channel(16);
        for target in [1, 1, 2] {
            tx.send(UserChoice::Passage {
                target_id: PassageId(target),
            })
            .await
            .unwrap();
        }
        drop(tx);

        run(&mut c, &mut rx).await.unwrap();
        assert_eq!(c.active_scene(), Some(SceneId::GameOver));
        assert!(c.ledger().is_reached("BadPath"));
    }

    #[tokio::test]
    async fn translated_input_can_skip_and_quit() {
        let mut c = controller();
        c.start().await.unwrap();

        let (tx, mut rx) = mpsc::channel(8);
        for line in ["", "noise", "go", "quit", "go"] {
            tx.send(line).await.unwrap();
        }
        drop(tx);

        let mut seen = Vec::new();
        run_with(&mut c, &mut rx, |_, line| {
            seen.push(line);
            match line {
                "go" => Input::Choice(UserChoice::Start {
                    variant: StartVariant::Default,
                }),
                "quit" => Input::Quit,
                _ => Input::Skip,
            }
        })
        .await
        .unwrap();

        assert_eq!(seen, vec!["", "noise", "go"]);
        assert_eq!(c.active_scene(), Some(SceneId::Prompts));
        assert_eq!(rx.try_recv().ok(), None);
    }

    #[tokio::test]
    async fn fatal_errors_stop_the_loop() {
        let mut c = controller();
        c.start().await.unwrap();
        c.dispatch(UserChoice::Start {
            variant: StartVariant::Default,
        })
        .await
        .unwrap();

        let (tx, mut rx) = mpsc::channel(4);
        tx.send(UserChoice::Passage {
            target_id: PassageId(7),
        })
        .await
        .unwrap();
        drop(tx);

        assert!(run(&mut c, &mut rx).await.is_err());
    }
}
