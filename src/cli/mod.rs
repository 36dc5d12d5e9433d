//! CLI command handling
//!
//! Dispatches CLI commands and formats their output.

use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::catalog::{is_comment, Catalog, ImageMap, OsTarget};
use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{paths, Result};
use crate::generate::{generate, GenerateOptions, GenerateReport};
use crate::staging::CommonFragmentPolicy;

/// Dispatch a CLI command, resolving relative paths against `root`
pub fn dispatch(command: Commands, root: &Path) -> Result<()> {
    match command {
        Commands::Genconfig {
            platform,
            provider,
            osversions,
            testfiles,
            uservars,
            platformfile,
            skip_duplicate_common,
            dry_run,
            json,
        } => {
            let config = Config::load()?;
            let opts = GenerateOptions {
                platform,
                provider,
                osversions,
                testfiles,
                // An empty value means no user variables
                uservars: uservars.filter(|s| !s.is_empty()).map(PathBuf::from),
                platformfile,
                common_policy: if skip_duplicate_common {
                    CommonFragmentPolicy::Skip
                } else {
                    CommonFragmentPolicy::Repeat
                },
                dry_run,
                root: root.to_path_buf(),
            };

            let report = generate(&opts, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report, root);
            }
            Ok(())
        }

        Commands::Platforms {
            platform,
            platformfile,
            json,
        } => {
            let catalog = Catalog::load(&paths::resolve(root, &platformfile))?;
            if let Some(name) = &platform {
                // Fail with the known platform list before printing anything
                catalog.platform(name)?;
            }
            list_platforms(&catalog, platform.as_deref(), json)
        }
    }
}

fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

fn print_report(report: &GenerateReport, root: &Path) {
    let names: Vec<&str> = report.targets.iter().map(|t| t.name.as_str()).collect();
    println!(
        "{} {} / {}",
        "Platform:".blue().bold(),
        report.platform,
        report.provider
    );
    if names.is_empty() {
        println!("{} {}", "OS targets:".blue().bold(), "none matched".yellow());
    } else {
        println!("{} {}", "OS targets:".blue().bold(), names.join(", "));
    }
    println!("TEST_PLATFORMS={}", report.test_platforms);

    println!("\n{}", "Fragments:".cyan());
    for fragment in &report.fragments {
        println!("  {}", display_path(fragment, root));
    }

    println!(
        "\n{} {}",
        "Environment:".cyan(),
        report.env_names.join(", ")
    );

    match &report.output {
        Some(output) => println!(
            "{} {} {} {}",
            "✓".green(),
            display_path(&report.staging, root),
            "->".dimmed(),
            display_path(output, root)
        ),
        None => println!(
            "{} wrote {}, renderer not run (dry run)",
            "-".dimmed(),
            display_path(&report.staging, root)
        ),
    }
}

fn selectable(images: &ImageMap) -> Vec<OsTarget> {
    images
        .iter()
        .filter(|(name, _)| !is_comment(name))
        .map(|(name, id)| OsTarget {
            name: name.clone(),
            id: id.clone(),
        })
        .collect()
}

/// List the catalog, optionally restricted to one platform
fn list_platforms(catalog: &Catalog, only: Option<&str>, json: bool) -> Result<()> {
    let mut results = Vec::new();

    for (platform, providers) in catalog.iter() {
        if only.is_some_and(|p| p != platform) {
            continue;
        }

        if !json {
            println!("{}", platform.white().bold());
        }
        for (provider, images) in providers {
            let targets = selectable(images);
            if json {
                results.push(serde_json::json!({
                    "platform": platform,
                    "provider": provider,
                    "images": targets,
                }));
            } else {
                let names: Vec<&str> = targets.iter().map(|t| t.name.as_str()).collect();
                println!("  {:10} {}", provider, names.join(", "));
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }
    Ok(())
}
