//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// External template renderer
    #[serde(default)]
    pub renderer: RendererConfig,

    /// File names of the fragment tree and the generated files
    #[serde(default)]
    pub layout: Layout,
}

/// Configuration for the external template renderer
///
/// The renderer is run as `<command> <args...> <staging file>` and its
/// stdout becomes the final document.
#[derive(Debug, Deserialize, Clone)]
pub struct RendererConfig {
    /// Program to invoke, looked up on PATH
    #[serde(default = "default_renderer")]
    pub command: String,

    /// Arguments placed before the staging file path
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: default_renderer(),
            args: Vec::new(),
        }
    }
}

fn default_renderer() -> String {
    "erb".to_string()
}

/// Where fragments are read from and generated files are written to,
/// relative to the working directory
#[derive(Debug, Deserialize, Clone)]
pub struct Layout {
    /// Directory holding `<provider>-driver.yml` fragments
    #[serde(default = "default_drivers_dir")]
    pub drivers_dir: PathBuf,

    /// Directory holding the common fragment and test definitions
    #[serde(default = "default_definitions_dir")]
    pub definitions_dir: PathBuf,

    /// File name of the common fragment inside `definitions_dir`
    #[serde(default = "default_common_fragment")]
    pub common_fragment: String,

    /// Concatenated document handed to the renderer
    #[serde(default = "default_staging_file")]
    pub staging_file: PathBuf,

    /// Rendered output
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            drivers_dir: default_drivers_dir(),
            definitions_dir: default_definitions_dir(),
            common_fragment: default_common_fragment(),
            staging_file: default_staging_file(),
            output_file: default_output_file(),
        }
    }
}

fn default_drivers_dir() -> PathBuf {
    PathBuf::from("drivers")
}
fn default_definitions_dir() -> PathBuf {
    PathBuf::from("test-definitions")
}
fn default_common_fragment() -> String {
    "platforms-common.yml".to_string()
}
fn default_staging_file() -> PathBuf {
    PathBuf::from("tmpkitchen.yml")
}
fn default_output_file() -> PathBuf {
    PathBuf::from("kitchen.yml")
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| super::Error::file_read(path, e))?;
        toml::from_str(&content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}
