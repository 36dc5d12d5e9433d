//! CLI command definitions
//!
//! Defines the clap commands for the kitchen CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Create a kitchen config
    Genconfig {
        /// Platform to configure (e.g. ubuntu, centos, windows)
        #[arg(long, short = 'p')]
        platform: Option<String>,

        /// Cloud provider the platform images come from
        #[arg(long, default_value = "azure")]
        provider: String,

        /// Comma-separated OS version patterns, or "all"
        #[arg(long, short = 'o', default_value = "all")]
        osversions: String,

        /// Test definition glob under test-definitions/, without ".yml"
        #[arg(long, short = 't')]
        testfiles: Option<String>,

        /// JSON file with "global" and per-provider environment variables
        #[arg(long)]
        uservars: Option<String>,

        /// Platform catalog
        #[arg(long, default_value = "platforms.json")]
        platformfile: PathBuf,

        /// Leave out the common fragment when the test file glob matches it
        #[arg(long)]
        skip_duplicate_common: bool,

        /// Write the staging file but do not run the template renderer
        #[arg(long)]
        dry_run: bool,

        /// Output the generation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List platforms, providers and OS images in the catalog
    Platforms {
        /// Only show this platform
        #[arg(long, short = 'p')]
        platform: Option<String>,

        /// Platform catalog
        #[arg(long, default_value = "platforms.json")]
        platformfile: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
