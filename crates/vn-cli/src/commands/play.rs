use std::io::{self, BufRead};
use std::path::Path;

use colored::Colorize;
use tokio::sync::mpsc;
use vn_engine::{EngineConfig, FileStore, Input, SceneController, runtime};

use crate::terminal::TerminalAdapter;

type Controller = SceneController<TerminalAdapter, FileStore>;

pub fn run(story: &Path, assets: Option<&Path>, save_dir: &Path, script: bool) -> Result<(), String> {
    let graph = super::load_story(story)?;
    let assets = super::load_assets(assets)?;
    std::fs::create_dir_all(save_dir)
        .map_err(|e| format!("cannot create save directory '{}': {e}", save_dir.display()))?;

    let adapter = TerminalAdapter::new(assets.clone());
    let mut controller = SceneController::hydrated(
        graph,
        assets,
        adapter,
        FileStore::new(save_dir),
        EngineConfig::default(),
    )
    .map_err(|e| format!("failed to load endings: {e}"))?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| e.to_string())?;

    rt.block_on(play(&mut controller, script))?;

    let ledger = controller.ledger();
    println!();
    println!(
        "  {} {}/{}",
        "Endings found:".bold(),
        ledger.reached_count(),
        ledger.total()
    );
    Ok(())
}

async fn play(controller: &mut Controller, script: bool) -> Result<(), String> {
    controller.start().await.map_err(|e| e.to_string())?;
    if script {
        play_script(controller).await
    } else {
        play_interactive(controller).await
    }
}

/// Lines are read on a separate thread and handed to the event loop, which
/// drops whatever was typed while a scene transition was in flight.
async fn play_interactive(controller: &mut Controller) -> Result<(), String> {
    let (tx, mut rx) = mpsc::channel::<String>(16);
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    runtime::run_with(controller, &mut rx, |adapter, line| adapter.interpret(&line))
        .await
        .map_err(|e| e.to_string())
}

/// Each line is fully handled before the next is read, so piped input
/// never races a transition.
async fn play_script(controller: &mut Controller) -> Result<(), String> {
    for line in io::stdin().lock().lines() {
        let line = line.map_err(|e| e.to_string())?;
        match controller.adapter().interpret(&line) {
            Input::Choice(choice) => {
                controller.dispatch(choice).await.map_err(|e| e.to_string())?;
            }
            Input::Skip => {}
            Input::Quit => break,
        }
    }
    Ok(())
}
