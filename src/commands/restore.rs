use anyhow::Result;
use tracing::info;

use crate::commands::CommandReport;
use crate::gomi::inventory::Inventory;
use crate::gomi::paths::GomiPaths;
use crate::gomi::restore;
use crate::gomi::select::{PromptSelector, Selector};

pub fn run(paths: &GomiPaths) -> Result<CommandReport> {
    run_with(paths, &mut PromptSelector::stdio())
}

pub fn run_with<S: Selector>(paths: &GomiPaths, selector: &mut S) -> Result<CommandReport> {
    let mut report = CommandReport::new("restore");
    let mut inventory = Inventory::load(&paths.inventory_file);

    let outcome = restore::restore(&mut inventory, selector)?;
    info!(id = %outcome.record.id, remaining = inventory.len(), "restore finished");

    report.detail(format!(
        "restored '{}' -> '{}'",
        outcome.record.archive_path.display(),
        outcome.destination.display()
    ));
    if outcome.renamed {
        report.warn(format!(
            "'{}' already exists, restored as '{}'",
            outcome.record.source_path.display(),
            outcome.destination.display()
        ));
    }

    Ok(report)
}
