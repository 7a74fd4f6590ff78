use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use crate::commands::CommandReport;
use crate::gomi::inventory::Inventory;
use crate::gomi::paths::GomiPaths;
use crate::gomi::relocate::{self, RemoveMode};

#[derive(Debug, Clone, Default)]
pub struct RemoveOptions {
    pub paths: Vec<PathBuf>,
    pub force: bool,
}

pub fn run(paths: &GomiPaths, opts: &RemoveOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("remove");
    let mut inventory = Inventory::load(&paths.inventory_file);
    let mode = if opts.force {
        RemoveMode::Force
    } else {
        RemoveMode::Strict
    };

    let outcome = relocate::remove(&paths.archive_dir, &mut inventory, &opts.paths, mode)?;
    info!(
        group_id = %outcome.group_id,
        archived = outcome.archived.len(),
        failed = outcome.failures.len(),
        inventory = %inventory.path().display(),
        "remove finished"
    );

    for record in &outcome.archived {
        report.detail(format!(
            "removed '{}' -> '{}'",
            record.source_path.display(),
            record.archive_path.display()
        ));
    }
    for failure in &outcome.failures {
        report.detail(format!("skipped: {failure}"));
    }

    Ok(report)
}
