use crate::gomi::paths::{GomiPaths, default_gomi_home};
use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "off";

#[derive(Debug, Clone)]
pub struct GomiConfig {
    pub paths: GomiPaths,
    pub log_filter: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    archive_dir: Option<String>,
    inventory_file: Option<String>,
    log: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn expand_home(raw: &str, home: Option<&Path>) -> PathBuf {
    match (raw.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(raw),
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let raw = fs::read_to_string(path)
        .map_err(|err| anyhow!("failed to read gomi config {}: {err}", path.display()))?;
    toml::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse gomi config {}: {err}", path.display()))
}

fn validate(cfg: &GomiConfig) -> Result<()> {
    let paths = &cfg.paths;
    if !paths.archive_dir.is_absolute() {
        return Err(anyhow!(
            "invalid archive dir {}: must be an absolute path",
            paths.archive_dir.display()
        ));
    }
    if !paths.inventory_file.is_absolute() {
        return Err(anyhow!(
            "invalid inventory file {}: must be an absolute path",
            paths.inventory_file.display()
        ));
    }
    if paths.archive_dir.starts_with(&paths.inventory_file) {
        return Err(anyhow!(
            "invalid layout: archive dir {} cannot live at or under the inventory file",
            paths.archive_dir.display()
        ));
    }
    EnvFilter::try_new(&cfg.log_filter)
        .map_err(|err| anyhow!("invalid log filter {:?}: {err}", cfg.log_filter))?;
    Ok(())
}

/// Layers defaults, the TOML config file and `GOMI_*` variables, in that order.
fn resolve(
    home_dir: Option<PathBuf>,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<GomiConfig> {
    let home = home_dir.as_deref();
    let gomi_home = match non_blank(lookup("GOMI_HOME")) {
        Some(custom) => expand_home(&custom, home),
        None => default_gomi_home(
            home.ok_or_else(|| anyhow!("HOME directory could not be resolved; set GOMI_HOME"))?,
        ),
    };

    let mut paths = GomiPaths::rooted_at(&gomi_home);
    if let Some(custom) = non_blank(lookup("GOMI_CONFIG_PATH")) {
        paths.config_file = expand_home(&custom, home);
    }

    let file = read_file_config(&paths.config_file)?;
    let mut log_filter = DEFAULT_LOG_FILTER.to_string();
    if let Some(dir) = non_blank(file.archive_dir) {
        paths.archive_dir = expand_home(&dir, home);
    }
    if let Some(inventory) = non_blank(file.inventory_file) {
        paths.inventory_file = expand_home(&inventory, home);
    }
    if let Some(log) = non_blank(file.log) {
        log_filter = log;
    }

    if let Some(dir) = non_blank(lookup("GOMI_ARCHIVE_DIR")) {
        paths.archive_dir = expand_home(&dir, home);
    }
    if let Some(inventory) = non_blank(lookup("GOMI_INVENTORY_PATH")) {
        paths.inventory_file = expand_home(&inventory, home);
    }
    if let Some(log) = non_blank(lookup("GOMI_LOG")) {
        log_filter = log;
    }

    let cfg = GomiConfig { paths, log_filter };
    validate(&cfg)?;
    Ok(cfg)
}

pub fn load_config() -> Result<GomiConfig> {
    resolve(dirs::home_dir(), &|var: &str| env::var(var).ok())
}
