//! Configuration and working-tree paths

use std::path::{Path, PathBuf};

/// Name used for the configuration directory
const APP_NAME: &str = "kitchen-config";

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/kitchen-config/` (or `$XDG_CONFIG_HOME/kitchen-config/`)
/// - macOS: `~/Library/Application Support/kitchen-config/`
/// - Windows: `%APPDATA%\kitchen-config\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Resolve `path` against `root` unless it is already absolute
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
