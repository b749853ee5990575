//! Parsing of `name==version` dependencies and `python/<name>` repository
//! names.

use crate::error::{PypiError, Result};
use crate::types::{PYTHON_SCHEME, PythonVersionedPackage, parse_package_name};
use pkgmirror_core::Package;

/// Parses a configured dependency such as `requests==2.31.0`.
///
/// Only exact pins are accepted. Specifiers like `>=2.0` or extras like
/// `requests[socks]==2.31.0` are rejected.
///
/// # Examples
///
/// ```
/// use pkgmirror_pypi::parse_dependency;
/// use pkgmirror_core::VersionedPackage;
///
/// let dep = parse_dependency("Flask==2.3.2").unwrap();
/// assert_eq!(dep.package_syntax(), "flask");
/// assert_eq!(dep.version(), "2.3.2");
/// ```
pub fn parse_dependency(dependency: &str) -> Result<PythonVersionedPackage> {
    let invalid = || PypiError::InvalidDependency {
        dependency: dependency.to_string(),
    };

    let (name, version) = dependency.split_once("==").ok_or_else(invalid)?;
    let (name, version) = (name.trim(), version.trim());
    if name.is_empty() || version.is_empty() || version.starts_with('=') {
        return Err(invalid());
    }

    PythonVersionedPackage::new(name, version)
}

/// Parses a mirror repository name such as `python/requests`.
pub fn parse_repo_name(repo_name: &str) -> Result<Package> {
    let name = repo_name
        .strip_prefix(PYTHON_SCHEME)
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| PypiError::InvalidRepoName(repo_name.to_string()))?;

    parse_package_name(name)
}
