//! Errors specific to crates.io package handling.

use pkgmirror_core::MirrorError;
use thiserror::Error;

/// Errors specific to crates.io package handling.
#[derive(Error, Debug)]
pub enum CargoError {
    /// Crate name breaks the crates.io naming rules
    #[error("Invalid crate name '{name}': {message}")]
    InvalidCrateName { name: String, message: String },

    /// Invalid semver version
    #[error("Invalid semver version '{version}': {message}")]
    InvalidVersion { version: String, message: String },

    /// Configured dependency is not `name@version`
    #[error("Invalid crate dependency '{dependency}': expected name@version")]
    InvalidDependency { dependency: String },

    /// Repository name is not under `crates/`
    #[error("Invalid crate repository name '{0}'")]
    InvalidRepoName(String),
}

/// Result type alias for Cargo operations.
pub type Result<T> = std::result::Result<T, CargoError>;

impl CargoError {
    pub fn invalid_name(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCrateName {
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

impl From<CargoError> for MirrorError {
    fn from(err: CargoError) -> Self {
        let message = err.to_string();
        match err {
            CargoError::InvalidCrateName { name: input, .. }
            | CargoError::InvalidVersion { version: input, .. }
            | CargoError::InvalidDependency { dependency: input }
            | CargoError::InvalidRepoName(input) => Self::parse(input, message),
        }
    }
}
