use anyhow::{Context, Result};
use clap::{Args, Parser};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::commands::{remove, restore};
use crate::gomi::config::load_config;
use crate::logging;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GOMI_REVISION"), ")");

#[derive(Debug, Parser)]
#[command(
    name = "gomi",
    version = VERSION,
    about = "Move files to a trash archive instead of deleting them",
    long_about = None
)]
pub struct Cli {
    /// Restore a deleted file
    #[arg(short = 'b', long = "restore")]
    restore: bool,

    #[command(flatten)]
    rm: RmOptions,

    /// Files or directories to remove
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,
}

/// Accepted so gomi can stand in for rm.
#[derive(Debug, Args)]
#[command(next_help_heading = "rm compatibility")]
struct RmOptions {
    /// Accepted for rm compatibility; gomi never prompts before removal
    #[arg(short = 'i')]
    interactive: bool,

    /// Accepted for rm compatibility; directories are always moved whole
    #[arg(short = 'r', short_alias = 'R')]
    recursive: bool,

    /// Ignore nonexistent files and other per-path failures
    #[arg(short = 'f', long = "force")]
    force: bool,

    /// Accepted for rm compatibility; directories are always moved whole
    #[arg(short = 'd')]
    directory: bool,

    /// Explain what is being done
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config().context("failed to load gomi configuration")?;
    logging::init(&config.log_filter);

    info!(version = VERSION, "starting gomi");
    info!(gomi_home = %config.paths.gomi_home.display(), "gomi home");
    info!(archive_dir = %config.paths.archive_dir.display(), "archive root");
    info!(inventory = %config.paths.inventory_file.display(), "inventory path");
    debug!(?cli, "parsed arguments");
    if cli.rm.interactive || cli.rm.recursive || cli.rm.directory {
        debug!("-i, -r and -d have no effect: directories are always moved whole");
    }

    let report = if cli.restore {
        if !cli.paths.is_empty() {
            debug!("ignoring {} path argument(s) in restore mode", cli.paths.len());
        }
        restore::run(&config.paths)?
    } else {
        remove::run(
            &config.paths,
            &remove::RemoveOptions {
                paths: cli.paths,
                force: cli.rm.force,
            },
        )?
    };

    report.print(cli.rm.verbose);
    Ok(())
}
