use crate::gomi::paths::{DOTENV_FILE, GOMI_DIR};
use std::env;
use std::path::PathBuf;

fn fallback_dotenv_path(gomi_home: Option<PathBuf>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    let base = gomi_home.or_else(|| home_dir.map(|home| home.join(GOMI_DIR)))?;
    Some(base.join(DOTENV_FILE))
}

/// Loads `$GOMI_HOME/.env` (or `~/.gomi/.env`) without overriding variables
/// that are already set.
pub fn load_dotenv() {
    let path = fallback_dotenv_path(
        env::var_os("GOMI_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from),
        dirs::home_dir(),
    );

    let Some(path) = path else {
        return;
    };
    if path.is_file() {
        let _ = dotenvy::from_path(&path);
    }
}
