//! Staging document assembly
//!
//! The staging document is the byte-for-byte concatenation of the
//! provider's driver fragment, the common fragment, and every test
//! definition matched by the test file glob. Fragments are not parsed.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::common::config::Layout;
use crate::common::{paths, Error, Result};

/// What to do when the test file glob also matches the common fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommonFragmentPolicy {
    /// Warn and append it a second time
    #[default]
    Repeat,
    /// Warn and leave it out
    Skip,
}

/// Fragment paths for one working directory
#[derive(Debug, Clone)]
pub struct Fragments<'a> {
    root: &'a Path,
    layout: &'a Layout,
}

impl<'a> Fragments<'a> {
    pub fn new(root: &'a Path, layout: &'a Layout) -> Self {
        Self { root, layout }
    }

    /// `drivers/<provider>-driver.yml`
    pub fn driver(&self, provider: &str) -> PathBuf {
        paths::resolve(self.root, &self.layout.drivers_dir)
            .join(format!("{}-driver.yml", provider))
    }

    /// `test-definitions/platforms-common.yml`
    pub fn common(&self) -> PathBuf {
        paths::resolve(self.root, &self.layout.definitions_dir).join(&self.layout.common_fragment)
    }

    /// Expand `test-definitions/<pattern>.yml`, in lexical order
    ///
    /// Wildcards do not match a leading dot, so hidden files are left out.
    pub fn test_definitions(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let dir = paths::resolve(self.root, &self.layout.definitions_dir);
        let full = format!(
            "{}/{}.yml",
            glob::Pattern::escape(&dir.to_string_lossy()),
            pattern
        );

        let options = glob::MatchOptions {
            require_literal_leading_dot: true,
            ..Default::default()
        };
        let entries = glob::glob_with(&full, options).map_err(|e| Error::InvalidGlob {
            pattern: pattern.to_string(),
            error: e.to_string(),
        })?;

        entries
            .map(|entry| {
                entry.map_err(|e| {
                    let path = e.path().to_path_buf();
                    Error::file_read(&path, io::Error::from(e))
                })
            })
            .collect()
    }

    /// Whether a matched definition is the common fragment under another name
    fn is_common(&self, path: &Path) -> bool {
        path.to_string_lossy()
            .to_lowercase()
            .ends_with(&self.layout.common_fragment.to_lowercase())
    }

    /// The ordered list of fragments making up the staging document
    pub fn plan(
        &self,
        provider: &str,
        testfiles: &str,
        policy: CommonFragmentPolicy,
    ) -> Result<Vec<PathBuf>> {
        let mut fragments = vec![self.driver(provider), self.common()];

        for path in self.test_definitions(testfiles)? {
            if self.is_common(&path) {
                match policy {
                    CommonFragmentPolicy::Repeat => {
                        warn!(path = %path.display(), "Test files include the common file, adding it again");
                    }
                    CommonFragmentPolicy::Skip => {
                        warn!(path = %path.display(), "Skipping common file");
                        continue;
                    }
                }
            }
            fragments.push(path);
        }

        Ok(fragments)
    }
}

/// Concatenate `fragments` into `staging`, overwriting it
///
/// A failure partway leaves the staging file incomplete.
pub fn write_staging(staging: &Path, fragments: &[PathBuf]) -> Result<()> {
    let file = File::create(staging).map_err(|e| Error::file_write(staging, e))?;
    let mut out = BufWriter::new(file);

    for fragment in fragments {
        info!("Adding file {}", fragment.display());
        let content = std::fs::read(fragment).map_err(|e| Error::file_read(fragment, e))?;
        out.write_all(&content)
            .map_err(|e| Error::file_write(staging, e))?;
    }

    out.flush().map_err(|e| Error::file_write(staging, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tree(root: &Path) {
        std::fs::create_dir_all(root.join("drivers")).unwrap();
        std::fs::create_dir_all(root.join("test-definitions")).unwrap();
        std::fs::write(root.join("drivers/azure-driver.yml"), "driver: azure\n").unwrap();
        std::fs::write(
            root.join("test-definitions/platforms-common.yml"),
            "common: true\n",
        )
        .unwrap();
        std::fs::write(root.join("test-definitions/upgrade5.yml"), "suite: upgrade5\n").unwrap();
        std::fs::write(root.join("test-definitions/upgrade6.yml"), "suite: upgrade6\n").unwrap();
        std::fs::write(root.join("test-definitions/chef-test.yml"), "suite: chef\n").unwrap();
        std::fs::write(root.join("test-definitions/.#chef-test.yml"), "hidden: true\n").unwrap();
    }

    fn file_names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_plan_orders_driver_common_then_glob() {
        let dir = tempdir().unwrap();
        tree(dir.path());
        let layout = Layout::default();
        let fragments = Fragments::new(dir.path(), &layout);

        let plan = fragments
            .plan("azure", "upgrade*", CommonFragmentPolicy::Repeat)
            .unwrap();
        assert_eq!(
            file_names(&plan),
            vec!["azure-driver.yml", "platforms-common.yml", "upgrade5.yml", "upgrade6.yml"]
        );
    }

    #[test]
    fn test_common_repeated_by_default() {
        let dir = tempdir().unwrap();
        tree(dir.path());
        let layout = Layout::default();
        let fragments = Fragments::new(dir.path(), &layout);

        let plan = fragments
            .plan("azure", "*", CommonFragmentPolicy::Repeat)
            .unwrap();
        assert_eq!(
            file_names(&plan),
            vec![
                "azure-driver.yml",
                "platforms-common.yml",
                "chef-test.yml",
                "platforms-common.yml",
                "upgrade5.yml",
                "upgrade6.yml",
            ]
        );
    }

    #[test]
    fn test_common_skipped_by_policy() {
        let dir = tempdir().unwrap();
        tree(dir.path());
        let layout = Layout::default();
        let fragments = Fragments::new(dir.path(), &layout);

        let plan = fragments.plan("azure", "*", CommonFragmentPolicy::Skip).unwrap();
        assert_eq!(
            file_names(&plan),
            vec![
                "azure-driver.yml",
                "platforms-common.yml",
                "chef-test.yml",
                "upgrade5.yml",
                "upgrade6.yml",
            ]
        );
    }

    #[test]
    fn test_wildcards_skip_hidden_files() {
        let dir = tempdir().unwrap();
        tree(dir.path());
        let layout = Layout::default();
        let fragments = Fragments::new(dir.path(), &layout);

        let defs = fragments.test_definitions("*").unwrap();
        assert_eq!(
            file_names(&defs),
            vec!["chef-test.yml", "platforms-common.yml", "upgrade5.yml", "upgrade6.yml"]
        );

        let plan = fragments
            .plan("azure", "*chef-test", CommonFragmentPolicy::Repeat)
            .unwrap();
        let staging = dir.path().join("tmpkitchen.yml");
        write_staging(&staging, &plan).unwrap();
        assert!(!std::fs::read_to_string(&staging).unwrap().contains("hidden"));
    }

    #[test]
    fn test_no_match_keeps_driver_and_common() {
        let dir = tempdir().unwrap();
        tree(dir.path());
        let layout = Layout::default();
        let fragments = Fragments::new(dir.path(), &layout);

        let plan = fragments
            .plan("azure", "nothing-here", CommonFragmentPolicy::Repeat)
            .unwrap();
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn test_invalid_glob() {
        let dir = tempdir().unwrap();
        tree(dir.path());
        let layout = Layout::default();
        let fragments = Fragments::new(dir.path(), &layout);

        assert!(matches!(
            fragments.test_definitions("[").unwrap_err(),
            Error::InvalidGlob { .. }
        ));
    }

    #[test]
    fn test_write_staging_concatenates_bytes() {
        let dir = tempdir().unwrap();
        tree(dir.path());
        let layout = Layout::default();
        let fragments = Fragments::new(dir.path(), &layout);
        let plan = fragments
            .plan("azure", "upgrade5", CommonFragmentPolicy::Repeat)
            .unwrap();

        let staging = dir.path().join("tmpkitchen.yml");
        std::fs::write(&staging, "stale content from a previous run\n").unwrap();
        write_staging(&staging, &plan).unwrap();

        assert_eq!(
            std::fs::read_to_string(&staging).unwrap(),
            "driver: azure\ncommon: true\nsuite: upgrade5\n"
        );
    }

    #[test]
    fn test_write_staging_missing_driver() {
        let dir = tempdir().unwrap();
        tree(dir.path());
        let layout = Layout::default();
        let fragments = Fragments::new(dir.path(), &layout);
        let plan = fragments
            .plan("ec2", "upgrade5", CommonFragmentPolicy::Repeat)
            .unwrap();

        let err = write_staging(&dir.path().join("tmpkitchen.yml"), &plan).unwrap_err();
        assert!(matches!(err, Error::FileRead { ref path, .. } if path.ends_with("ec2-driver.yml")));
    }
}
