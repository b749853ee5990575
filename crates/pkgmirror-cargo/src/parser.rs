//! Parsing of `name@version` dependencies and `crates/<name>` repository
//! names.

use crate::error::{CargoError, Result};
use crate::types::{CRATES_SCHEME, CrateVersionedPackage, parse_package_name};
use pkgmirror_core::Package;

/// Parses a configured dependency such as `serde@1.0.188`.
pub fn parse_dependency(dependency: &str) -> Result<CrateVersionedPackage> {
    let (name, version) = dependency
        .split_once('@')
        .filter(|(name, version)| !name.is_empty() && !version.is_empty())
        .ok_or_else(|| CargoError::InvalidDependency {
            dependency: dependency.to_string(),
        })?;

    CrateVersionedPackage::new(name, version)
}

/// Parses a mirror repository name such as `crates/serde`.
pub fn parse_repo_name(repo_name: &str) -> Result<Package> {
    let name = repo_name
        .strip_prefix(CRATES_SCHEME)
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| CargoError::InvalidRepoName(repo_name.to_string()))?;

    parse_package_name(name)
}
