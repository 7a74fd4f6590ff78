use std::path::{Path, PathBuf};

pub const GOMI_DIR: &str = ".gomi";
pub const INVENTORY_FILE: &str = "inventory.json";
pub const CONFIG_FILE: &str = "config.toml";
pub const DOTENV_FILE: &str = ".env";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GomiPaths {
    pub gomi_home: PathBuf,
    pub archive_dir: PathBuf,
    pub inventory_file: PathBuf,
    pub config_file: PathBuf,
}

impl GomiPaths {
    /// Default layout rooted at `gomi_home`: archives live directly under it
    /// next to the inventory file.
    pub fn rooted_at(gomi_home: &Path) -> Self {
        Self {
            gomi_home: gomi_home.to_path_buf(),
            archive_dir: gomi_home.to_path_buf(),
            inventory_file: gomi_home.join(INVENTORY_FILE),
            config_file: gomi_home.join(CONFIG_FILE),
        }
    }
}

pub fn default_gomi_home(home: &Path) -> PathBuf {
    home.join(GOMI_DIR)
}
