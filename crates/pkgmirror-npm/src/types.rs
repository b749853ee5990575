use crate::error::{NpmError, Result};
use pkgmirror_core::{Package, VersionedPackage, is_valid_tag_name};
use std::any::Any;
use std::cmp::Ordering;

/// Catalog scheme of npm packages.
pub const NPM_SCHEME: &str = "npm";

const MAX_NAME_LENGTH: usize = 214;

/// An npm package pinned to one version.
///
/// Versions are ordered by npm semver precedence, so `1.0.0-beta.2` sorts
/// before `1.0.0` and build metadata is ignored.
///
/// # Examples
///
/// ```
/// use pkgmirror_npm::NpmVersionedPackage;
/// use pkgmirror_core::VersionedPackage;
///
/// let dep = NpmVersionedPackage::new("@types/node", "18.11.9").unwrap();
/// assert_eq!(dep.versioned_package_syntax(), "@types/node@18.11.9");
/// assert_eq!(dep.git_tag(), "v18.11.9");
/// assert_eq!(dep.package().repo_name(), "npm/@types/node");
/// ```
#[derive(Debug, Clone)]
pub struct NpmVersionedPackage {
    package: Package,
    version: String,
    parsed: node_semver::Version,
}

impl NpmVersionedPackage {
    /// Validates `name` and `version` and builds the package.
    pub fn new(name: &str, version: &str) -> Result<Self> {
        let package = parse_package_name(name)?;

        let parsed = node_semver::Version::parse(version)
            .map_err(|e| NpmError::invalid_version(version, e.to_string()))?;
        if !is_valid_tag_name(&format!("v{version}")) {
            return Err(NpmError::invalid_version(
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

    pub fn semver(&self) -> &node_semver::Version {
        &self.parsed
    }
}

impl VersionedPackage for NpmVersionedPackage {
    fn package(&self) -> &Package {
        &self.package
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn versioned_package_syntax(&self) -> String {
        format!("{}@{}", self.package.package_syntax(), self.version)
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

/// Validates an npm package name (`left-pad`, `@types/node`).
///
/// Follows the registry's rules for new and legacy names: at most 214
/// characters, URL-safe, no leading `.` or `_`, and scoped names of exactly
/// the form `@scope/name`. Uppercase letters are accepted because some
/// legacy packages still use them.
pub fn parse_package_name(name: &str) -> Result<Package> {
    if name.is_empty() {
        return Err(NpmError::invalid_package_name(name, "name is empty"));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(NpmError::invalid_package_name(
            name,
            "name is longer than 214 characters",
        ));
    }

    let bare = match name.strip_prefix('@') {
        Some(scoped) => {
            let (scope, bare) = scoped.split_once('/').ok_or_else(|| {
                NpmError::invalid_package_name(name, "scoped name must be @scope/name")
            })?;
            validate_part(name, scope)?;
            bare
        }
        None => name,
    };
    validate_part(name, bare)?;

    Ok(Package::new(NPM_SCHEME, name))
}

fn validate_part(name: &str, part: &str) -> Result<()> {
    if part.is_empty() {
        return Err(NpmError::invalid_package_name(name, "empty name segment"));
    }
    if part.starts_with('.') || part.starts_with('_') {
        return Err(NpmError::invalid_package_name(
            name,
            "name cannot start with a period or underscore",
        ));
    }
    if !part
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~'))
    {
        return Err(NpmError::invalid_package_name(
            name,
            "name contains characters that are not URL-safe",
        ));
    }
    Ok(())
}
