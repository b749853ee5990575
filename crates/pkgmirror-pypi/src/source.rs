//! Python package source.
//!
//! Source distributions unpack to `<name>-<version>/`; that directory is
//! stripped so the commit tree holds the project files at its root.

use async_trait::async_trait;
use pkgmirror_core::{
    MirrorError, Package, PackageSource, RegistryClient, Result, VersionedPackage, extract_tar_gz,
};
use std::any::Any;
use std::path::Path;

use crate::parser::{parse_dependency, parse_repo_name};
use crate::registry::PypiRegistry;
use crate::types::{PYTHON_SCHEME, PythonVersionedPackage};

pub struct PythonSource {
    registry: PypiRegistry,
}

impl PythonSource {
    /// Creates a source for pypi.org.
    pub fn new(client: RegistryClient) -> Self {
        Self {
            registry: PypiRegistry::new(client),
        }
    }

    pub fn with_registry(registry: PypiRegistry) -> Self {
        Self { registry }
    }

    fn downcast(dep: &dyn VersionedPackage) -> Result<&PythonVersionedPackage> {
        dep.as_any()
            .downcast_ref::<PythonVersionedPackage>()
            .ok_or_else(|| MirrorError::UnsupportedScheme(dep.package().scheme().to_string()))
    }
}

#[async_trait]
impl PackageSource for PythonSource {
    fn scheme(&self) -> &'static str {
        PYTHON_SCHEME
    }

    async fn download(&self, dir: &Path, dep: &dyn VersionedPackage) -> Result<()> {
        let dep = Self::downcast(dep)?;
        let sdist = self.registry.download_sdist(dep).await?;

        let syntax = dep.versioned_package_syntax();
        let written = extract_tar_gz(&sdist, dir, 1, &syntax)?;
        tracing::debug!(dependency = %syntax, files = written, "extracted sdist");
        Ok(())
    }

    fn parse_versioned_package_from_name_and_version(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Box<dyn VersionedPackage>> {
        Ok(Box::new(PythonVersionedPackage::new(name, version)?))
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
