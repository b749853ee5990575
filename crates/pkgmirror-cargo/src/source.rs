//! crates.io package source.

use async_trait::async_trait;
use pkgmirror_core::{
    MirrorError, Package, PackageSource, RegistryClient, Result, VersionedPackage, extract_tar_gz,
};
use std::any::Any;
use std::path::Path;

use crate::parser::{parse_dependency, parse_repo_name};
use crate::registry::CratesRegistry;
use crate::types::{CRATES_SCHEME, CrateVersionedPackage};

/// Mirrors crates from crates.io.
///
/// A `.crate` archive holds a single `<name>-<version>/` directory, which is
/// stripped on extraction.
pub struct CratesSource {
    registry: CratesRegistry,
}

impl CratesSource {
    pub fn new(client: RegistryClient) -> Self {
        Self {
            registry: CratesRegistry::new(client),
        }
    }

    pub fn with_registry(registry: CratesRegistry) -> Self {
        Self { registry }
    }

    fn downcast(dep: &dyn VersionedPackage) -> Result<&CrateVersionedPackage> {
        dep.as_any()
            .downcast_ref::<CrateVersionedPackage>()
            .ok_or_else(|| MirrorError::UnsupportedScheme(dep.package().scheme().to_string()))
    }
}

#[async_trait]
impl PackageSource for CratesSource {
    fn scheme(&self) -> &'static str {
        CRATES_SCHEME
    }

    async fn download(&self, dir: &Path, dep: &dyn VersionedPackage) -> Result<()> {
        let dep = Self::downcast(dep)?;
        let archive = self.registry.download_crate(dep).await?;

        let syntax = dep.versioned_package_syntax();
        let written = extract_tar_gz(&archive, dir, 1, &syntax)?;
        tracing::debug!(dependency = %syntax, files = written, "extracted crate");
        Ok(())
    }

    fn parse_versioned_package_from_name_and_version(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Box<dyn VersionedPackage>> {
        Ok(Box::new(CrateVersionedPackage::new(name, version)?))
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
