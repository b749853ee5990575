use pkgmirror_core::DependencyRepo;
use pkgmirror_core::git::{CommitIdentity, DEFAULT_COMMIT_DATE, DEFAULT_COMMIT_EMAIL};
use serde::Deserialize;
use std::path::Path;

use crate::error::{CliError, Result};

/// Root configuration of a mirror site.
///
/// Read from a JSON file. Every field is optional.
///
/// # Examples
///
/// ```
/// use pkgmirror::config::MirrorConfig;
///
/// let json = r#"{
///     "npm": { "dependencies": ["left-pad@1.3.0"] },
///     "catalog": [{ "scheme": "npm", "name": "left-pad", "version": "1.2.0" }]
/// }"#;
///
/// let config: MirrorConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.npm.dependencies, vec!["left-pad@1.3.0"]);
/// assert!(config.python.dependencies.is_empty());
/// assert_eq!(config.catalog.len(), 1);
/// ```
#[derive(Debug, Deserialize, Default)]
pub struct MirrorConfig {
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub npm: EcosystemConfig,
    #[serde(default)]
    pub python: EcosystemConfig,
    #[serde(default)]
    pub crates: EcosystemConfig,
    /// Seeds the in-memory dependency catalog.
    #[serde(default)]
    pub catalog: Vec<DependencyRepo>,
}

impl MirrorConfig {
    /// Reads and parses a configuration file.
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read(path).await.map_err(|source| CliError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&raw).map_err(|source| CliError::InvalidConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the section for `scheme`, if the scheme is known.
    pub fn ecosystem(&self, scheme: &str) -> Option<&EcosystemConfig> {
        match scheme {
            pkgmirror_npm::NPM_SCHEME => Some(&self.npm),
            pkgmirror_pypi::PYTHON_SCHEME => Some(&self.python),
            pkgmirror_cargo::CRATES_SCHEME => Some(&self.crates),
            _ => None,
        }
    }
}

/// Author email and date stamped on every mirrored commit.
///
/// # Defaults
///
/// - `email`: `"mirror@pkgmirror.invalid"`
/// - `date`: `"Thu Apr 8 14:24:52 2021 +0200"`
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_email")]
    pub email: String,
    #[serde(default = "default_date")]
    pub date: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            email: default_email(),
            date: default_date(),
        }
    }
}

impl From<&IdentityConfig> for CommitIdentity {
    fn from(config: &IdentityConfig) -> Self {
        Self {
            email: config.email.clone(),
            date: config.date.clone(),
        }
    }
}

/// Per-ecosystem site configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EcosystemConfig {
    /// Pinned versions to mirror in addition to the catalog, in the
    /// ecosystem's own syntax.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Registry to download from instead of the public one.
    #[serde(default)]
    pub registry_url: Option<String>,
}

fn default_email() -> String {
    DEFAULT_COMMIT_EMAIL.to_string()
}

fn default_date() -> String {
    DEFAULT_COMMIT_DATE.to_string()
}
