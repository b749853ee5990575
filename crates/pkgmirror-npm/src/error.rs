//! Errors specific to npm package handling.
//!
//! These cover package name and version validation, the site configuration
//! syntax, and registry metadata that cannot be used to locate a tarball.

use pkgmirror_core::MirrorError;
use thiserror::Error;

/// Errors specific to npm package handling.
#[derive(Error, Debug)]
pub enum NpmError {
    /// Package name violates npm naming rules
    #[error("Invalid npm package name '{name}': {message}")]
    InvalidPackageName { name: String, message: String },

    /// Version is not valid npm semver or not usable as a tag
    #[error("Invalid npm version '{version}': {message}")]
    InvalidVersion { version: String, message: String },

    /// Configured dependency is not `name@version`
    #[error("Invalid npm dependency '{dependency}': expected name@version")]
    InvalidDependency { dependency: String },

    /// Repository name is not under `npm/`
    #[error("Invalid npm repository name '{0}'")]
    InvalidRepoName(String),

    /// Package or version not found on npm registry
    #[error("Package '{package}' not found on npm registry")]
    PackageNotFound { package: String },

    /// Version metadata has no tarball
    #[error("npm metadata for '{package}' has no dist.tarball")]
    MissingTarball { package: String },
}

/// Result type alias for npm operations.
pub type Result<T> = std::result::Result<T, NpmError>;

impl NpmError {
    pub fn invalid_package_name(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPackageName {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn invalid_version(version: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
            message: message.into(),
        }
    }
}

/// Convert to MirrorError at the `PackageSource` boundary
impl From<NpmError> for MirrorError {
    fn from(err: NpmError) -> Self {
        let message = err.to_string();
        match err {
            NpmError::PackageNotFound { package } | NpmError::MissingTarball { package } => {
                Self::not_found(package)
            }
            NpmError::InvalidPackageName { name: input, .. }
            | NpmError::InvalidVersion { version: input, .. }
            | NpmError::InvalidDependency { dependency: input }
            | NpmError::InvalidRepoName(input) => Self::parse(input, message),
        }
    }
}
