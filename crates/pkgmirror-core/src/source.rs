use crate::error::Result;
use crate::package::{Package, Placeholder, VersionedPackage};
use async_trait::async_trait;
use std::any::Any;
use std::path::Path;

/// A source of package dependencies, e.g. npm, PyPI or crates.io.
///
/// Implemented once per ecosystem and chosen by scheme when the syncer is
/// built. The syncer depends only on this contract; registry protocols, name
/// normalization and version ordering all live behind it.
///
/// # Examples
///
/// ```no_run
/// use pkgmirror_core::{Package, PackageSource, Result, VersionedPackage};
/// use async_trait::async_trait;
/// use std::any::Any;
/// use std::path::Path;
///
/// struct MySource;
///
/// #[async_trait]
/// impl PackageSource for MySource {
///     fn scheme(&self) -> &'static str {
///         "mine"
///     }
///
///     async fn download(&self, _dir: &Path, _dep: &dyn VersionedPackage) -> Result<()> {
///         Ok(())
///     }
///
///     fn parse_versioned_package_from_name_and_version(
///         &self,
///         _name: &str,
///         _version: &str,
///     ) -> Result<Box<dyn VersionedPackage>> {
///         unimplemented!()
///     }
///
///     fn parse_versioned_package_from_configuration(
///         &self,
///         _dep: &str,
///     ) -> Result<Box<dyn VersionedPackage>> {
///         unimplemented!()
///     }
///
///     fn parse_package_from_repo_name(&self, repo_name: &str) -> Result<Package> {
///         Ok(Package::new("mine", repo_name.trim_start_matches("mine/")))
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
/// ```
#[async_trait]
pub trait PackageSource: Send + Sync {
    /// Catalog scheme handled by this source (`npm`, `python`, `crates`).
    fn scheme(&self) -> &'static str;

    /// Downloads the given dependency's archive and unpacks it into `dir`.
    ///
    /// Every extracted path must be passed through
    /// [`sanitize_archive_path`](crate::sanitize::sanitize_archive_path).
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::NotFound`](crate::MirrorError::NotFound) when the
    /// registry does not have this version; the syncer treats that as benign.
    async fn download(&self, dir: &Path, dep: &dyn VersionedPackage) -> Result<()>;

    /// Parses a package name and version as found in the dependency catalog.
    fn parse_versioned_package_from_name_and_version(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Box<dyn VersionedPackage>>;

    /// Parses a package and version from the site configuration's
    /// `dependencies` list.
    fn parse_versioned_package_from_configuration(
        &self,
        dep: &str,
    ) -> Result<Box<dyn VersionedPackage>>;

    /// Parses the repository name of a mirrored package, e.g. `npm/left-pad`.
    fn parse_package_from_repo_name(&self, repo_name: &str) -> Result<Package>;

    /// Fixed, non-identifying package used as the author of git commands that
    /// do not create commits or tags.
    fn placeholder(&self) -> Box<dyn VersionedPackage> {
        Box::new(Placeholder::new(self.scheme()))
    }

    /// Downcast to concrete source type
    fn as_any(&self) -> &dyn Any;
}
