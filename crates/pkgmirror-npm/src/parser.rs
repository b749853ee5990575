//! Parsing of configured dependencies and mirror repository names.

use crate::error::{NpmError, Result};
use crate::types::{NPM_SCHEME, NpmVersionedPackage, parse_package_name};
use pkgmirror_core::Package;

/// Parses a configured dependency such as `left-pad@1.3.0` or
/// `@types/node@18.11.9`.
///
/// The version is everything after the last `@` that is not the scope
/// marker.
///
/// # Examples
///
/// ```
/// use pkgmirror_npm::parse_dependency;
/// use pkgmirror_core::VersionedPackage;
///
/// let dep = parse_dependency("@types/node@18.11.9").unwrap();
/// assert_eq!(dep.package_syntax(), "@types/node");
/// assert_eq!(dep.version(), "18.11.9");
/// ```
pub fn parse_dependency(dependency: &str) -> Result<NpmVersionedPackage> {
    let invalid = || NpmError::InvalidDependency {
        dependency: dependency.to_string(),
    };

    let at = dependency.rfind('@').filter(|&i| i > 0).ok_or_else(invalid)?;
    let (name, version) = (&dependency[..at], &dependency[at + 1..]);
    if version.is_empty() {
        return Err(invalid());
    }

    NpmVersionedPackage::new(name, version)
}

/// Parses a mirror repository name such as `npm/@types/node`.
pub fn parse_repo_name(repo_name: &str) -> Result<Package> {
    let name = repo_name
        .strip_prefix(NPM_SCHEME)
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| NpmError::InvalidRepoName(repo_name.to_string()))?;

    parse_package_name(name)
}
