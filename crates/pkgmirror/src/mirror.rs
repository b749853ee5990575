//! Wiring of sources, catalog and git runner into per-repository syncers.

use pkgmirror_cargo::{CratesRegistry, CratesSource};
use pkgmirror_core::{
    CommitIdentity, InMemoryCatalog, MirrorError, PackageSource, PackagesSyncer, ProcessGitRunner,
    RegistryClient, SourceRegistry,
};
use pkgmirror_npm::{NpmRegistry, NpmSource};
use pkgmirror_pypi::{PypiRegistry, PythonSource};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::{EcosystemConfig, MirrorConfig};
use crate::error::Result;

/// What [`Mirror::sync`] did to the bare repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Cloned,
    Fetched,
}

pub struct Mirror {
    config: MirrorConfig,
    sources: SourceRegistry,
    catalog: Arc<InMemoryCatalog>,
    git: Arc<ProcessGitRunner>,
}

impl Mirror {
    pub fn new(config: MirrorConfig) -> Result<Self> {
        let sources = SourceRegistry::new();
        sources.register(Arc::new(NpmSource::with_registry(NpmRegistry::with_base_url(
            client_for(&config.npm)?,
            base_url(&config.npm, pkgmirror_npm::registry::REGISTRY_BASE),
        ))));
        sources.register(Arc::new(PythonSource::with_registry(
            PypiRegistry::with_base_url(
                client_for(&config.python)?,
                base_url(&config.python, pkgmirror_pypi::registry::PYPI_BASE),
            ),
        )));
        sources.register(Arc::new(CratesSource::with_registry(
            CratesRegistry::with_base_url(
                client_for(&config.crates)?,
                base_url(&config.crates, pkgmirror_cargo::registry::STATIC_BASE),
            ),
        )));

        let catalog = Arc::new(InMemoryCatalog::with_repos(config.catalog.iter().cloned()));
        let git = Arc::new(ProcessGitRunner::new(CommitIdentity::from(&config.identity)));

        Ok(Self {
            config,
            sources,
            catalog,
            git,
        })
    }

    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    /// Builds the syncer responsible for `repo_name`.
    pub fn syncer(&self, repo_name: &str, cancel: CancellationToken) -> Result<PackagesSyncer> {
        let source: Arc<dyn PackageSource> = self.sources.get_for_repo_name(repo_name)?;
        let config_deps = self
            .config
            .ecosystem(source.scheme())
            .map(|eco| eco.dependencies.clone())
            .unwrap_or_default();

        Ok(PackagesSyncer::new(
            source,
            config_deps,
            self.catalog.clone(),
            self.git.clone(),
        )
        .with_cancellation(cancel))
    }

    /// Brings the bare repository at `bare_dir` up to date with the registry.
    ///
    /// A directory without `HEAD` is initialized first. Nothing is written
    /// for an unparsable repository name.
    pub async fn sync(
        &self,
        repo_name: &str,
        bare_dir: &Path,
        cancel: CancellationToken,
    ) -> Result<SyncAction> {
        let syncer = self.syncer(repo_name, cancel.clone())?;
        syncer.is_cloneable(repo_name)?;
        syncer.source().parse_package_from_repo_name(repo_name)?;
        if cancel.is_cancelled() {
            return Err(MirrorError::Cancelled.into());
        }

        if tokio::fs::try_exists(bare_dir.join("HEAD")).await.unwrap_or(false) {
            tracing::info!(repo = repo_name, syncer = syncer.type_name(), "fetching");
            syncer.fetch(repo_name, bare_dir).await?;
            Ok(SyncAction::Fetched)
        } else {
            tracing::info!(repo = repo_name, syncer = syncer.type_name(), "cloning");
            syncer.clone_repo(repo_name, bare_dir).await?;
            Ok(SyncAction::Cloned)
        }
    }
}

fn client_for(config: &EcosystemConfig) -> Result<RegistryClient> {
    let client = RegistryClient::new()?;
    let plain_http = config
        .registry_url
        .as_deref()
        .is_some_and(|url| url.starts_with("http://"));
    Ok(if plain_http {
        client.allow_insecure_http()
    } else {
        client
    })
}

fn base_url(config: &EcosystemConfig, default: &str) -> String {
    config
        .registry_url
        .clone()
        .unwrap_or_else(|| default.to_string())
}
