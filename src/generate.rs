//! Kitchen config generation
//!
//! Resolves a platform/provider/OS selection against the catalog, writes
//! the staging document and hands it to the template renderer together
//! with the `TEST_PLATFORMS` environment.

use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use crate::catalog::{test_platforms, Catalog, OsSelection, OsTarget};
use crate::common::config::Config;
use crate::common::{paths, Error, Result};
use crate::render::Renderer;
use crate::staging::{write_staging, CommonFragmentPolicy, Fragments};
use crate::uservars::build_environment;

/// Options for a generation run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Platform to configure (required)
    pub platform: Option<String>,
    /// Cloud provider
    pub provider: String,
    /// Comma-separated OS version patterns, or `all`
    pub osversions: String,
    /// Test definition glob, without the `.yml` suffix (required)
    pub testfiles: Option<String>,
    /// Optional user variables file
    pub uservars: Option<PathBuf>,
    /// Platform catalog
    pub platformfile: PathBuf,
    /// Handling of the common fragment when the glob matches it
    pub common_policy: CommonFragmentPolicy,
    /// Stop after writing the staging file
    pub dry_run: bool,
    /// Directory relative paths resolve against
    pub root: PathBuf,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            platform: None,
            provider: "azure".to_string(),
            osversions: "all".to_string(),
            testfiles: None,
            uservars: None,
            platformfile: PathBuf::from("platforms.json"),
            common_policy: CommonFragmentPolicy::default(),
            dry_run: false,
            root: PathBuf::from("."),
        }
    }
}

/// What a generation run produced
#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
    pub platform: String,
    pub provider: String,
    pub targets: Vec<OsTarget>,
    pub test_platforms: String,
    pub fragments: Vec<PathBuf>,
    pub staging: PathBuf,
    /// `None` on a dry run
    pub output: Option<PathBuf>,
    /// Names of the variables passed to the renderer
    pub env_names: Vec<String>,
}

fn require<'a>(value: Option<&'a str>, what: &str) -> Result<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::MissingArgument(what.to_string())),
    }
}

/// Generate a kitchen config
pub fn generate(opts: &GenerateOptions, config: &Config) -> Result<GenerateReport> {
    let platform = require(opts.platform.as_deref(), "a platform to configure")?;
    let testfiles = require(opts.testfiles.as_deref(), "one or more testfiles to include")?;
    let root = opts.root.as_path();

    let catalog = Catalog::load(&paths::resolve(root, &opts.platformfile))?;
    let images = catalog.provider(platform, &opts.provider)?;

    let targets = OsSelection::parse(&opts.osversions)?.resolve(images);
    info!(
        "Chose os targets {:?}",
        targets.iter().map(|t| t.name.as_str()).collect::<Vec<_>>()
    );

    let test_platforms = test_platforms(&targets);
    info!("TEST_PLATFORMS={}", test_platforms);

    let layout = &config.layout;
    let fragments =
        Fragments::new(root, layout).plan(&opts.provider, testfiles, opts.common_policy)?;
    let staging = paths::resolve(root, &layout.staging_file);
    write_staging(&staging, &fragments)?;

    let uservars = opts.uservars.as_deref().map(|p| paths::resolve(root, p));
    let env = build_environment(uservars.as_deref(), &opts.provider, &test_platforms)?;

    let output = if opts.dry_run {
        info!("Dry run, not rendering {}", staging.display());
        None
    } else {
        let output = paths::resolve(root, &layout.output_file);
        Renderer::from_config(&config.renderer)?.render(root, &staging, &output, &env)?;
        Some(output)
    };

    Ok(GenerateReport {
        platform: platform.to_string(),
        provider: opts.provider.clone(),
        targets,
        test_platforms,
        fragments,
        staging,
        output,
        env_names: env.keys().cloned().collect(),
    })
}
