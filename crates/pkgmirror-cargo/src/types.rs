use crate::error::{CargoError, Result};
use pkgmirror_core::{Package, VersionedPackage, is_valid_tag_name};
use semver::Version;
use std::any::Any;
use std::cmp::Ordering;

/// Catalog scheme of Rust crates.
pub const CRATES_SCHEME: &str = "crates";

const MAX_NAME_LENGTH: usize = 64;

/// Validates a crate name the way crates.io does on publish.
pub fn parse_package_name(name: &str) -> Result<Package> {
    let Some(first) = name.chars().next() else {
        return Err(CargoError::invalid_name(name, "empty name"));
    };
    if name.len() > MAX_NAME_LENGTH {
        return Err(CargoError::invalid_name(
            name,
            format!("longer than {MAX_NAME_LENGTH} characters"),
        ));
    }
    if !first.is_ascii_alphabetic() {
        return Err(CargoError::invalid_name(name, "must start with a letter"));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(CargoError::invalid_name(
            name,
            format!("invalid character {c:?}"),
        ));
    }
    Ok(Package::new(CRATES_SCHEME, name))
}

/// A crate pinned to one published version.
///
/// # Examples
///
/// ```
/// use pkgmirror_cargo::CrateVersionedPackage;
/// use pkgmirror_core::VersionedPackage;
///
/// let dep = CrateVersionedPackage::new("serde", "1.0.188").unwrap();
/// assert_eq!(dep.versioned_package_syntax(), "serde@1.0.188");
/// assert_eq!(dep.package().repo_name(), "crates/serde");
/// ```
#[derive(Debug, Clone)]
pub struct CrateVersionedPackage {
    package: Package,
    version: String,
    parsed: Version,
}

impl CrateVersionedPackage {
    pub fn new(name: &str, version: &str) -> Result<Self> {
        let package = parse_package_name(name)?;
        let parsed =
            Version::parse(version).map_err(|e| CargoError::invalid_version(version, e.to_string()))?;
        if !is_valid_tag_name(&format!("v{version}")) {
            return Err(CargoError::invalid_version(
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

    pub fn semver(&self) -> &Version {
        &self.parsed
    }
}

impl VersionedPackage for CrateVersionedPackage {
    fn package(&self) -> &Package {
        &self.package
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn versioned_package_syntax(&self) -> String {
        format!("{}@{}", self.package.package_syntax(), self.version)
    }

    // Version::cmp also orders build metadata, so distinct strings never
    // compare equal.
    fn compare(&self, other: &dyn VersionedPackage) -> Ordering {
        match other.as_any().downcast_ref::<Self>() {
            Some(other) => self.parsed.cmp(&other.parsed),
            None => self.version.as_str().cmp(other.version()),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgmirror_core::sort_newest_first;

    #[test]
    fn test_valid_names() {
        for name in ["serde", "tokio-util", "serde_json", "a", "Inflector"] {
            assert!(parse_package_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_names() {
        let long = "a".repeat(65);
        for name in ["", "1password", "-dash", "has space", "../etc", "a/b", "crate.name", &long] {
            assert!(parse_package_name(name).is_err(), "{name:?} should be invalid");
        }
    }

    #[test]
    fn test_invalid_versions() {
        assert!(CrateVersionedPackage::new("serde", "1.0").is_err());
        assert!(CrateVersionedPackage::new("serde", "^1.0.0").is_err());
        assert!(CrateVersionedPackage::new("serde", "latest").is_err());
    }

    #[test]
    fn test_semver_ordering() {
        let mut versions: Vec<Box<dyn VersionedPackage>> = [
            "1.0.0", "1.0.0-alpha.1", "0.9.12", "1.10.0", "1.2.0", "1.0.0-beta",
        ]
        .into_iter()
        .map(|v| Box::new(CrateVersionedPackage::new("pkg", v).unwrap()) as Box<dyn VersionedPackage>)
        .collect();
        sort_newest_first(&mut versions);

        let sorted: Vec<_> = versions.iter().map(|v| v.version().to_string()).collect();
        assert_eq!(
            sorted,
            vec!["1.10.0", "1.2.0", "1.0.0", "1.0.0-beta", "1.0.0-alpha.1", "0.9.12"]
        );
    }

    #[test]
    fn test_build_metadata_is_kept_in_tag() {
        let dep = CrateVersionedPackage::new("openssl-src", "300.1.3+3.1.2").unwrap();
        assert_eq!(dep.git_tag(), "v300.1.3+3.1.2");
    }
}
