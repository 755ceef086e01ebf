use std::collections::BTreeSet;
use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use vn_core::{OutcomeCategory, PassageGraph, PassageId, StartVariant, classify};
use vn_engine::AssetManifest;

pub fn run(story: &Path, assets: Option<&Path>) -> Result<(), String> {
    let graph = super::load_story(story)?;
    let manifest = super::load_assets(assets)?;

    let endings: Vec<_> = graph.endings().collect();
    println!("  {} passages, {} endings", graph.len(), endings.len());
    println!(
        "  start: {}, alternate start: {}",
        graph.start(StartVariant::Default),
        graph.start(StartVariant::Alt)
    );

    if !endings.is_empty() {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Id", "Ending", "Outcome"]);
        for passage in &endings {
            let outcome = classify(&passage.tags).map(|o| o.tag).unwrap_or_default();
            table.add_row(vec![passage.id.to_string(), passage.name.clone(), outcome]);
        }
        println!("{table}");
    }

    let unreachable = unreachable(&graph);
    if unreachable.is_empty() {
        println!("  Every passage is reachable.");
    } else {
        println!(
            "  {} {} unreachable from either start:",
            "warning:".yellow().bold(),
            plural(unreachable.len(), "passage")
        );
        for passage in graph.iter().filter(|p| unreachable.contains(&p.id)) {
            println!("    {} {}", passage.id.to_string().dimmed(), passage.name);
        }
    }

    if assets.is_some() {
        report_assets(&graph, &manifest);
    }

    Ok(())
}

/// Ids of passages neither start node leads to. Menu pages are entered
/// from outside the story flow and are never reported.
fn unreachable(graph: &PassageGraph) -> BTreeSet<PassageId> {
    let mut reached = graph.reachable_from(graph.start(StartVariant::Default));
    reached.extend(graph.reachable_from(graph.start(StartVariant::Alt)));
    graph
        .iter()
        .filter(|p| !reached.contains(&p.id))
        .filter(|p| !classify(&p.tags).is_some_and(|o| o.category == OutcomeCategory::Menu))
        .map(|p| p.id)
        .collect()
}

fn report_assets(graph: &PassageGraph, manifest: &AssetManifest) {
    println!(
        "  {} backgrounds, {} animations",
        manifest.backgrounds.len(),
        manifest.animations.len()
    );
    let unknown: Vec<&str> = manifest
        .animations
        .names()
        .filter(|name| graph.find_by_name(name).is_none())
        .collect();
    for name in unknown {
        println!(
            "  {} animation for unknown passage '{name}'",
            "warning:".yellow().bold()
        );
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}
