//! Package identities and versioned packages.
//!
//! A [`Package`] names a dependency inside one ecosystem (`npm` + `left-pad`).
//! A [`VersionedPackage`] pins it to one version and knows how that version is
//! rendered in the mirror repository: the commit/tag message, the tag name and
//! the ordering used to pick the `latest` branch.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;

/// Ecosystem-scoped package identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Package {
    scheme: String,
    name: String,
}

impl Package {
    pub fn new(scheme: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            name: name.into(),
        }
    }

    /// Catalog scheme, e.g. `npm`, `python`, `crates`.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Ecosystem-native package syntax, e.g. `@types/node`.
    pub fn package_syntax(&self) -> &str {
        &self.name
    }

    /// Repository name under which the package is mirrored, e.g. `npm/left-pad`.
    pub fn repo_name(&self) -> String {
        format!("{}/{}", self.scheme, self.name)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A package pinned to a single version.
///
/// Implemented once per ecosystem. Implementations must guarantee that
/// [`git_tag`](Self::git_tag) is injective over versions of one package and
/// that [`compare`](Self::compare) is a total order.
pub trait VersionedPackage: Send + Sync + fmt::Debug {
    /// The unversioned identity.
    fn package(&self) -> &Package;

    /// Version string exactly as the registry spells it.
    fn version(&self) -> &str;

    /// Display string used as commit message, tag message and author seed.
    fn versioned_package_syntax(&self) -> String;

    /// Canonical tag name for this version.
    fn git_tag(&self) -> String {
        format!("v{}", self.version())
    }

    /// Ecosystem-specific version ordering. `Greater` means `self` is newer.
    fn compare(&self, other: &dyn VersionedPackage) -> Ordering;

    /// Downcast to concrete type
    fn as_any(&self) -> &dyn Any;

    fn package_syntax(&self) -> &str {
        self.package().package_syntax()
    }
}

impl fmt::Display for dyn VersionedPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.versioned_package_syntax())
    }
}

/// Author identity for git commands that do not create commits or tags.
///
/// Its name never appears in mirrored history, so it can be anything that is
/// stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    package: Package,
}

impl Placeholder {
    pub const NAME: &'static str = "pkgmirror-placeholder";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            package: Package::new(scheme, Self::NAME),
        }
    }
}

impl VersionedPackage for Placeholder {
    fn package(&self) -> &Package {
        &self.package
    }

    fn version(&self) -> &str {
        Self::VERSION
    }

    fn versioned_package_syntax(&self) -> String {
        format!("{}@{}", Self::NAME, Self::VERSION)
    }

    fn compare(&self, other: &dyn VersionedPackage) -> Ordering {
        Self::VERSION.cmp(other.version())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Sorts packages newest-first.
///
/// The sort is stable: versions that compare equal keep their relative order.
pub fn sort_newest_first(packages: &mut [Box<dyn VersionedPackage>]) {
    packages.sort_by(|a, b| b.compare(a.as_ref()));
}

/// Checks that `name` is usable as a git tag.
///
/// Follows the rules of `git check-ref-format` for a single ref component
/// path: no control characters, spaces or `~^:?*[\`, no `..` or `@{`, no
/// leading/trailing slash or dot, no empty component and no `.lock` suffix.
///
/// # Examples
///
/// ```
/// use pkgmirror_core::package::is_valid_tag_name;
///
/// assert!(is_valid_tag_name("v1.2.3"));
/// assert!(is_valid_tag_name("v1.0.0-beta.1+build.5"));
/// assert!(!is_valid_tag_name("v1..2"));
/// assert!(!is_valid_tag_name("v1 2"));
/// ```
pub fn is_valid_tag_name(name: &str) -> bool {
    if name.is_empty() || name == "@" {
        return false;
    }
    if name.starts_with('/') || name.ends_with('/') || name.ends_with('.') {
        return false;
    }
    if name.contains("..") || name.contains("@{") || name.contains("//") {
        return false;
    }
    if name
        .chars()
        .any(|c| c.is_control() || matches!(c, ' ' | '~' | '^' | ':' | '?' | '*' | '[' | '\\'))
    {
        return false;
    }
    name.split('/')
        .all(|part| !part.starts_with('.') && !part.ends_with(".lock"))
}
