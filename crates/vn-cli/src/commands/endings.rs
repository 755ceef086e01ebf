use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use vn_engine::{EndingsLedger, EngineConfig, FileStore};

pub fn run(story: &Path, save_dir: &Path) -> Result<(), String> {
    let graph = super::load_story(story)?;
    let config = EngineConfig::default();
    let store = FileStore::new(save_dir);
    let ledger = EndingsLedger::hydrate(&graph, &store, &config.ledger_key)
        .map_err(|e| format!("cannot read endings in '{}': {e}", store.dir().display()))?;

    if ledger.total() == 0 {
        println!("  This story has no endings.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Ending", "Outcome", "Reached", "First reached"]);

    for (name, record) in ledger.iter() {
        let reached = if record.reached {
            "yes".green().to_string()
        } else {
            "no".dimmed().to_string()
        };
        let first = record
            .first_reached_at
            .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "—".to_string());
        table.add_row(vec![
            name.to_string(),
            record.outcome.clone().unwrap_or_default(),
            reached,
            first,
        ]);
    }

    println!("{table}");
    println!();
    println!("  {}/{} endings reached", ledger.reached_count(), ledger.total());

    Ok(())
}
