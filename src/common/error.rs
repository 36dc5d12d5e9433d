//! Error types for the kitchen config generator
//!
//! Three failures are part of the command-line contract and carry their
//! own exit codes: a missing required argument, an unknown platform and an
//! unknown provider. Everything else exits with the generic failure code.

use std::path::Path;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Exit code for a missing required argument
pub const EXIT_USAGE: i32 = 1;
/// Exit code for a platform absent from the catalog
pub const EXIT_UNKNOWN_PLATFORM: i32 = 2;
/// Exit code for a provider absent under the selected platform
pub const EXIT_UNKNOWN_PROVIDER: i32 = 3;
/// Exit code for every other failure
pub const EXIT_FAILURE: i32 = 1;

/// Main error type for the generator
#[derive(Error, Debug)]
pub enum Error {
    // === Usage Errors ===
    #[error("Must supply {0}")]
    MissingArgument(String),

    // === Catalog Errors ===
    #[error("Unknown platform {platform}.  Known platforms are {known}")]
    UnknownPlatform { platform: String, known: String },

    #[error("Unknown provider {provider}.  Known providers for platform {platform} are {known}")]
    UnknownProvider {
        provider: String,
        platform: String,
        known: String,
    },

    #[error("Invalid platform catalog '{path}': {error}")]
    CatalogParse { path: String, error: String },

    // === Selection Errors ===
    #[error("Invalid OS version pattern '{pattern}': {error}")]
    InvalidPattern { pattern: String, error: String },

    #[error("Invalid test file pattern '{pattern}': {error}")]
    InvalidGlob { pattern: String, error: String },

    // === User Variables Errors ===
    #[error("Invalid user variables file '{path}': {error}")]
    UserVarsParse { path: String, error: String },

    // === Renderer Errors ===
    #[error("Template renderer '{0}' not found on PATH")]
    RendererNotFound(String),

    #[error("Template renderer '{command}' failed: {status}")]
    RendererFailed { command: String, status: String },

    // === Configuration Errors ===
    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    #[error("Failed to write file '{path}': {error}")]
    FileWrite { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an unknown platform error listing the catalog's platforms
    pub fn unknown_platform<S: AsRef<str>>(platform: &str, known: &[S]) -> Self {
        Self::UnknownPlatform {
            platform: platform.to_string(),
            known: format_names(known),
        }
    }

    /// Create an unknown provider error listing the platform's providers
    pub fn unknown_provider<S: AsRef<str>>(provider: &str, platform: &str, known: &[S]) -> Self {
        Self::UnknownProvider {
            provider: provider.to_string(),
            platform: platform.to_string(),
            known: format_names(known),
        }
    }

    /// Create a file read error
    pub fn file_read(path: &Path, error: impl ToString) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Create a file write error
    pub fn file_write(path: &Path, error: impl ToString) -> Self {
        Self::FileWrite {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::MissingArgument(_) => EXIT_USAGE,
            Error::UnknownPlatform { .. } => EXIT_UNKNOWN_PLATFORM,
            Error::UnknownProvider { .. } => EXIT_UNKNOWN_PROVIDER,
            _ => EXIT_FAILURE,
        }
    }
}

/// Render a name list as `['a', 'b']`
fn format_names<S: AsRef<str>>(names: &[S]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{}'", n.as_ref())).collect();
    format!("[{}]", quoted.join(", "))
}
