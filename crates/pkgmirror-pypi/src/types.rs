use crate::error::{PypiError, Result};
use once_cell::sync::Lazy;
use pep440_rs::Version;
use pkgmirror_core::{Package, VersionedPackage, is_valid_tag_name};
use regex::Regex;
use std::any::Any;
use std::cmp::Ordering;
use std::str::FromStr;

/// Catalog scheme of Python packages.
pub const PYTHON_SCHEME: &str = "python";

/// Valid project names, from the core metadata specification.
static PROJECT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([A-Z0-9]|[A-Z0-9][A-Z0-9._-]*[A-Z0-9])$").unwrap());

/// Normalize package name according to PEP 503.
///
/// Converts package name to lowercase and replaces runs of `-`, `_` and `.`
/// with a single hyphen.
///
/// # Examples
///
/// ```
/// # use pkgmirror_pypi::normalize_package_name;
/// assert_eq!(normalize_package_name("Flask"), "flask");
/// assert_eq!(normalize_package_name("django_rest_framework"), "django-rest-framework");
/// assert_eq!(normalize_package_name("Pillow.Image"), "pillow-image");
/// assert_eq!(normalize_package_name("my__package"), "my-package");
/// ```
pub fn normalize_package_name(name: &str) -> String {
    name.to_lowercase()
        .replace(&['_', '.'][..], "-")
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Validates a project name and returns the package under its normalized
/// name.
pub fn parse_package_name(name: &str) -> Result<Package> {
    if !PROJECT_NAME.is_match(name) {
        return Err(PypiError::InvalidPackageName {
            name: name.to_string(),
        });
    }
    Ok(Package::new(PYTHON_SCHEME, normalize_package_name(name)))
}

/// A Python package pinned to one release.
///
/// The name is normalized, so `Django==4.2` and `django==4.2` are the same
/// package. Versions are ordered by PEP 440, so `1.0rc1 < 1.0 < 1.0.post1`.
///
/// # Examples
///
/// ```
/// use pkgmirror_pypi::PythonVersionedPackage;
/// use pkgmirror_core::VersionedPackage;
///
/// let dep = PythonVersionedPackage::new("Django", "4.2.1").unwrap();
/// assert_eq!(dep.versioned_package_syntax(), "django==4.2.1");
/// assert_eq!(dep.git_tag(), "v4.2.1");
/// assert_eq!(dep.package().repo_name(), "python/django");
/// ```
#[derive(Debug, Clone)]
pub struct PythonVersionedPackage {
    package: Package,
    version: String,
    parsed: Version,
}

impl PythonVersionedPackage {
    pub fn new(name: &str, version: &str) -> Result<Self> {
        let package = parse_package_name(name)?;

        let parsed = Version::from_str(version)
            .map_err(|e| PypiError::invalid_version(version, e.to_string()))?;
        if !is_valid_tag_name(&format!("v{version}")) {
            return Err(PypiError::invalid_version(
                version,
                "not usable as a git tag name",
            ));
        }

        Ok(Self {
            package,
            version: version.to_string(),
            parsed,
        })
    }

    pub fn pep440(&self) -> &Version {
        &self.parsed
    }
}

impl VersionedPackage for PythonVersionedPackage {
    fn package(&self) -> &Package {
        &self.package
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn versioned_package_syntax(&self) -> String {
        format!("{}=={}", self.package.package_syntax(), self.version)
    }

    fn compare(&self, other: &dyn VersionedPackage) -> Ordering {
        match other.as_any().downcast_ref::<Self>() {
            Some(other) => self
                .parsed
                .cmp(&other.parsed)
                .then_with(|| self.version.cmp(&other.version)),
            None => self.version.as_str().cmp(other.version()),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
