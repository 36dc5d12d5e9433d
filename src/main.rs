//! Kitchen config generator
//!
//! Builds a test-kitchen `kitchen.yml` from a platform catalog, driver and
//! test definition fragments, and an external template renderer.

use clap::error::ErrorKind;
use clap::Parser;
use kitchen::commands::Commands;
use kitchen::common::error::EXIT_USAGE;
use kitchen::{cli, common::logging};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kitchen", about = "Generate test-kitchen configuration")]
#[command(version, long_about = None)]
struct Cli {
    /// Run as if started in this directory
    #[arg(short = 'C', long = "directory", global = true, default_value = ".")]
    directory: PathBuf,

    /// Debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    // Argument errors share the missing-argument exit code; clap's own
    // code 2 means "unknown platform" here
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => std::process::exit(0),
                _ => std::process::exit(EXIT_USAGE),
            }
        }
    };

    if cli.verbose {
        logging::init_verbose();
    } else {
        logging::init_cli();
    }

    if let Err(e) = cli::dispatch(cli.command, &cli.directory) {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
