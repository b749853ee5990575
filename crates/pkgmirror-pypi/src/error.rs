//! Errors specific to Python package handling.

use pkgmirror_core::MirrorError;
use thiserror::Error;

/// Errors specific to PyPI package handling.
///
/// Covers PEP 503 name validation, PEP 440 version parsing, the
/// `name==version` configuration syntax, and releases that cannot be
/// mirrored because they have no source distribution.
#[derive(Error, Debug)]
pub enum PypiError {
    /// Package name is not a valid Python project name
    #[error("Invalid Python package name '{name}'")]
    InvalidPackageName { name: String },

    /// Invalid PEP 440 version
    #[error("Invalid PEP 440 version '{version}': {message}")]
    InvalidVersion { version: String, message: String },

    /// Configured dependency is not `name==version`
    #[error("Invalid Python dependency '{dependency}': expected name==version")]
    InvalidDependency { dependency: String },

    /// Repository name is not under `python/`
    #[error("Invalid Python repository name '{0}'")]
    InvalidRepoName(String),

    /// Release has no `.tar.gz` source distribution
    #[error("No source distribution for '{package}' on PyPI")]
    NoSourceDistribution { package: String },
}

/// Result type alias for PyPI operations.
pub type Result<T> = std::result::Result<T, PypiError>;

impl PypiError {
    pub fn invalid_version(version: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
            message: message.into(),
        }
    }
}

/// Convert to MirrorError at the `PackageSource` boundary
impl From<PypiError> for MirrorError {
    fn from(err: PypiError) -> Self {
        let message = err.to_string();
        match err {
            PypiError::NoSourceDistribution { package } => Self::not_found(package),
            PypiError::InvalidPackageName { name: input }
            | PypiError::InvalidVersion { version: input, .. }
            | PypiError::InvalidDependency { dependency: input }
            | PypiError::InvalidRepoName(input) => Self::parse(input, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PypiError::InvalidPackageName {
            name: "-bad-".into(),
        };
        assert_eq!(err.to_string(), "Invalid Python package name '-bad-'");

        let err = PypiError::NoSourceDistribution {
            package: "wheel-only==1.0".into(),
        };
        assert_eq!(
            err.to_string(),
            "No source distribution for 'wheel-only==1.0' on PyPI"
        );
    }

    #[test]
    fn test_missing_sdist_is_not_found() {
        let err: MirrorError = PypiError::NoSourceDistribution {
            package: "wheel-only==1.0".into(),
        }
        .into();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_dependency_is_parse_error() {
        let err: MirrorError = PypiError::InvalidDependency {
            dependency: "requests>=2".into(),
        }
        .into();
        assert!(matches!(err, MirrorError::Parse { ref input, .. } if input == "requests>=2"));
    }
}
