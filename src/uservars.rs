//! User variables and the renderer environment
//!
//! A user variables file is a JSON object with a `global` section and one
//! section per provider:
//!
//! ```json
//! { "global": { "API_KEY": "..." }, "azure": { "AZURE_LOCATION": "..." } }
//! ```
//!
//! The selected provider's section overrides same-named `global` keys.

use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::common::{Error, Result};

/// Name of the variable describing the selected OS targets
pub const TEST_PLATFORMS: &str = "TEST_PLATFORMS";

/// Environment variables passed to the renderer, in insertion order
pub type Environment = IndexMap<String, String>;

/// On-disk layout of a user variables file
#[derive(Debug, Deserialize, Default)]
struct UserVarsFile {
    #[serde(default)]
    global: Environment,

    #[serde(flatten)]
    providers: IndexMap<String, Environment>,
}

/// Load the variables for `provider` from a user variables file
///
/// A path that does not exist yields an empty set; a missing `global` or
/// provider section counts as empty.
pub fn load_user_env(path: &Path, provider: &str) -> Result<Environment> {
    if !path.exists() {
        info!(path = %path.display(), "User variables file not found, skipping");
        return Ok(Environment::new());
    }

    let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
    let vars: UserVarsFile = serde_json::from_str(&content).map_err(|e| Error::UserVarsParse {
        path: path.display().to_string(),
        error: e.to_string(),
    })?;

    let mut env = vars.global;
    if let Some(section) = vars.providers.get(provider) {
        for (key, val) in section {
            env.insert(key.clone(), val.clone());
        }
    }
    debug!(count = env.len(), provider, "Loaded user variables");
    Ok(env)
}

/// Build the renderer environment
///
/// `TEST_PLATFORMS` is inserted last so user variables cannot override it.
pub fn build_environment(
    uservars: Option<&Path>,
    provider: &str,
    test_platforms: &str,
) -> Result<Environment> {
    let mut env = match uservars {
        Some(path) => load_user_env(path, provider)?,
        None => Environment::new(),
    };
    env.insert(TEST_PLATFORMS.to_string(), test_platforms.to_string());
    Ok(env)
}
