//! npm package source.
//!
//! Implements [`PackageSource`] for npm packages: tarballs from the npm
//! registry, unpacked with their top-level `package/` directory removed.

use async_trait::async_trait;
use pkgmirror_core::{
    MirrorError, Package, PackageSource, RegistryClient, Result, VersionedPackage, extract_tar_gz,
};
use std::any::Any;
use std::path::Path;

use crate::parser::{parse_dependency, parse_repo_name};
use crate::registry::NpmRegistry;
use crate::types::{NPM_SCHEME, NpmVersionedPackage};

/// npm package source.
pub struct NpmSource {
    registry: NpmRegistry,
}

impl NpmSource {
    /// Creates a source for the public npm registry.
    pub fn new(client: RegistryClient) -> Self {
        Self {
            registry: NpmRegistry::new(client),
        }
    }

    pub fn with_registry(registry: NpmRegistry) -> Self {
        Self { registry }
    }

    fn downcast(dep: &dyn VersionedPackage) -> Result<&NpmVersionedPackage> {
        dep.as_any()
            .downcast_ref::<NpmVersionedPackage>()
            .ok_or_else(|| MirrorError::UnsupportedScheme(dep.package().scheme().to_string()))
    }
}

#[async_trait]
impl PackageSource for NpmSource {
    fn scheme(&self) -> &'static str {
        NPM_SCHEME
    }

    async fn download(&self, dir: &Path, dep: &dyn VersionedPackage) -> Result<()> {
        let dep = Self::downcast(dep)?;
        let tarball = self.registry.download_tarball(dep).await?;

        let syntax = dep.versioned_package_syntax();
        let written = extract_tar_gz(&tarball, dir, 1, &syntax)?;
        tracing::debug!(dependency = %syntax, files = written, "extracted npm tarball");
        Ok(())
    }

    fn parse_versioned_package_from_name_and_version(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Box<dyn VersionedPackage>> {
        Ok(Box::new(NpmVersionedPackage::new(name, version)?))
    }

    fn parse_versioned_package_from_configuration(
        &self,
        dep: &str,
    ) -> Result<Box<dyn VersionedPackage>> {
        Ok(Box::new(parse_dependency(dep)?))
    }

    fn parse_package_from_repo_name(&self, repo_name: &str) -> Result<Package> {
        Ok(parse_repo_name(repo_name)?)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
