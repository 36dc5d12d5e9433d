//! Platform catalog
//!
//! The catalog maps platform name → provider name → OS image name → the
//! provider-specific image identifier. Object key order from the JSON file
//! is preserved; it decides the order of the resolved OS targets.

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::common::{Error, Result};

/// Image keys starting with this prefix are annotations, never targets
const COMMENT_PREFIX: &str = "comment";

/// Pattern used when every OS version is requested
const MATCH_ALL: &str = ".*";

/// OS image name → provider image identifier
pub type ImageMap = IndexMap<String, String>;

/// Provider name → images available from that provider
pub type ProviderMap = IndexMap<String, ImageMap>;

/// The full platform catalog
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    platforms: IndexMap<String, ProviderMap>,
}

impl Catalog {
    /// Load the catalog from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
        let catalog: Catalog =
            serde_json::from_str(&content).map_err(|e| Error::CatalogParse {
                path: path.display().to_string(),
                error: e.to_string(),
            })?;
        debug!(
            path = %path.display(),
            platforms = catalog.platforms.len(),
            "Loaded platform catalog"
        );
        Ok(catalog)
    }

    /// Platform names in catalog order
    pub fn platform_names(&self) -> Vec<&str> {
        self.platforms.keys().map(String::as_str).collect()
    }

    /// Look up a platform's providers
    pub fn platform(&self, platform: &str) -> Result<&ProviderMap> {
        self.platforms
            .get(platform)
            .ok_or_else(|| Error::unknown_platform(platform, &self.platform_names()))
    }

    /// Look up the images a provider offers for a platform
    pub fn provider(&self, platform: &str, provider: &str) -> Result<&ImageMap> {
        let providers = self.platform(platform)?;
        providers.get(provider).ok_or_else(|| {
            let known: Vec<&str> = providers.keys().map(String::as_str).collect();
            Error::unknown_provider(provider, platform, &known)
        })
    }

    /// Iterate over every (platform, providers) entry in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProviderMap)> {
        self.platforms.iter().map(|(name, p)| (name.as_str(), p))
    }
}

impl std::str::FromStr for Catalog {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

/// Whether an image key is a catalog annotation
pub fn is_comment(key: &str) -> bool {
    key.starts_with(COMMENT_PREFIX)
}

/// A selected OS image and its provider identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OsTarget {
    pub name: String,
    pub id: String,
}

/// Comma-separated OS version patterns
///
/// Each pattern is a regex searched anywhere in the image key. The literal
/// `all` (any case) selects every image.
#[derive(Debug, Clone)]
pub struct OsSelection {
    patterns: Vec<Regex>,
}

impl OsSelection {
    /// Parse a selection string such as `all`, `ubuntu` or `ubuntu,centos-7`
    pub fn parse(selection: &str) -> Result<Self> {
        let selection = if selection.eq_ignore_ascii_case("all") {
            MATCH_ALL
        } else {
            selection
        };

        let patterns = selection
            .split(',')
            .map(|p| {
                Regex::new(p).map_err(|e| Error::InvalidPattern {
                    pattern: p.to_string(),
                    error: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Resolve the selection against a provider's images
    ///
    /// Results are grouped by pattern, each group in catalog order. An image
    /// matched by several patterns appears once per matching pattern.
    pub fn resolve(&self, images: &ImageMap) -> Vec<OsTarget> {
        let mut targets = Vec::new();
        for pattern in &self.patterns {
            for (name, id) in images {
                if is_comment(name) {
                    continue;
                }
                if pattern.is_match(name) {
                    targets.push(OsTarget {
                        name: name.clone(),
                        id: id.clone(),
                    });
                }
            }
        }
        targets
    }
}

/// Build the `TEST_PLATFORMS` value: `name,id` pairs joined by `|`
pub fn test_platforms(targets: &[OsTarget]) -> String {
    targets
        .iter()
        .map(|t| format!("{},{}", t.name, t.id))
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "linux": {
            "azure": {
                "comment1": "x",
                "ubuntu18": "img1",
                "centos7": "img2"
            }
        }
    }"#;

    fn sample() -> Catalog {
        SAMPLE.parse().unwrap()
    }

    fn names(targets: &[OsTarget]) -> Vec<&str> {
        targets.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_all_selects_every_non_comment_key_in_order() {
        let catalog = sample();
        let images = catalog.provider("linux", "azure").unwrap();
        let targets = OsSelection::parse("all").unwrap().resolve(images);
        assert_eq!(names(&targets), vec!["ubuntu18", "centos7"]);
        assert_eq!(test_platforms(&targets), "ubuntu18,img1|centos7,img2");
    }

    #[test]
    fn test_all_is_case_insensitive() {
        let catalog = sample();
        let images = catalog.provider("linux", "azure").unwrap();
        let targets = OsSelection::parse("ALL").unwrap().resolve(images);
        assert_eq!(names(&targets), vec!["ubuntu18", "centos7"]);
    }

    #[test]
    fn test_patterns_are_grouped_and_keep_duplicates() {
        let catalog: Catalog = r#"{"linux": {"azure": {
            "ubuntu-16-04": "a",
            "centos-76": "b",
            "ubuntu-18-04": "c",
            "debian-9": "d"
        }}}"#
            .parse()
            .unwrap();
        let images = catalog.provider("linux", "azure").unwrap();

        let targets = OsSelection::parse("centos,ubuntu").unwrap().resolve(images);
        assert_eq!(names(&targets), vec!["centos-76", "ubuntu-16-04", "ubuntu-18-04"]);

        let targets = OsSelection::parse("ubuntu,18").unwrap().resolve(images);
        assert_eq!(
            names(&targets),
            vec!["ubuntu-16-04", "ubuntu-18-04", "ubuntu-18-04"]
        );
    }

    #[test]
    fn test_pattern_searches_anywhere_in_key() {
        let catalog = sample();
        let images = catalog.provider("linux", "azure").unwrap();
        let targets = OsSelection::parse("18$").unwrap().resolve(images);
        assert_eq!(names(&targets), vec!["ubuntu18"]);
    }

    #[test]
    fn test_comment_keys_never_selected() {
        let catalog = sample();
        let images = catalog.provider("linux", "azure").unwrap();
        let targets = OsSelection::parse("comment").unwrap().resolve(images);
        assert!(targets.is_empty());
        assert_eq!(test_platforms(&targets), "");
    }

    #[test]
    fn test_invalid_pattern() {
        let err = OsSelection::parse("ubuntu,(").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { ref pattern, .. } if pattern == "("));
    }

    #[test]
    fn test_unknown_platform() {
        let err = sample().provider("bsd", "azure").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("['linux']"));
    }

    #[test]
    fn test_unknown_provider() {
        let err = sample().provider("linux", "gcp").unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("['azure']"));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("platforms.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Catalog::load(&path).unwrap_err(),
            Error::CatalogParse { .. }
        ));

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            Catalog::load(&missing).unwrap_err(),
            Error::FileRead { .. }
        ));
    }
}
