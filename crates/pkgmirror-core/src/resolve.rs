use crate::catalog::{DependencyCatalog, ListDependencyReposOpts};
use crate::error::{MirrorError, Result};
use crate::source::PackageSource;
use std::sync::Arc;

/// Collects the candidate versions of one package.
///
/// Configured dependencies come first, in configuration order, followed by
/// the catalog's versions newest-first. Duplicates are kept; the syncer skips
/// a version whose tag already exists, so repeating one is harmless.
pub struct VersionResolver {
    config_deps: Vec<String>,
    source: Arc<dyn PackageSource>,
    catalog: Arc<dyn DependencyCatalog>,
}

impl VersionResolver {
    pub fn new(
        config_deps: Vec<String>,
        source: Arc<dyn PackageSource>,
        catalog: Arc<dyn DependencyCatalog>,
    ) -> Self {
        Self {
            config_deps,
            source,
            catalog,
        }
    }

    pub fn config_deps(&self) -> &[String] {
        &self.config_deps
    }

    /// Returns every version string to mirror for `package_name`.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Catalog`] if the catalog query fails. Malformed
    /// configuration entries are logged and skipped.
    pub async fn versions(&self, package_name: &str) -> Result<Vec<String>> {
        let mut versions = Vec::new();

        for raw in &self.config_deps {
            let dep = match self.source.parse_versioned_package_from_configuration(raw) {
                Ok(dep) => dep,
                Err(e) => {
                    tracing::warn!(dep = %raw, error = %e, "skipping malformed dependency");
                    continue;
                }
            };

            if dep.package_syntax() == package_name {
                versions.push(dep.version().to_string());
            }
        }

        let opts = ListDependencyReposOpts {
            scheme: self.source.scheme().to_string(),
            name: package_name.to_string(),
            newest_first: true,
        };
        let repos = self
            .catalog
            .list_dependency_repos(&opts)
            .await
            .map_err(|e| match e {
                MirrorError::Catalog(_) => e,
                other => MirrorError::Catalog(other.to_string()),
            })?;

        versions.extend(repos.into_iter().map(|repo| repo.version));
        Ok(versions)
    }
}
