//! Dependency catalog boundary.
//!
//! The catalog is the service that records which package versions are known
//! to the wider system (for example, versions discovered in lockfiles). It is
//! the authoritative list of versions to mirror; site configuration only adds
//! to it.

use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::RwLock;

/// One known `(scheme, name, version)` record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DependencyRepo {
    pub scheme: String,
    pub name: String,
    pub version: String,
}

impl DependencyRepo {
    pub fn new(
        scheme: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Filter for [`DependencyCatalog::list_dependency_repos`].
#[derive(Debug, Clone, Default)]
pub struct ListDependencyReposOpts {
    pub scheme: String,
    pub name: String,
    /// Return the most recently recorded versions first.
    pub newest_first: bool,
}

#[async_trait]
pub trait DependencyCatalog: Send + Sync {
    /// Lists the recorded versions of one package.
    ///
    /// # Errors
    ///
    /// Any error is fatal for the sync pass that asked.
    async fn list_dependency_repos(
        &self,
        opts: &ListDependencyReposOpts,
    ) -> Result<Vec<DependencyRepo>>;
}

/// Catalog held in memory, in insertion order.
///
/// "Newest" means most recently inserted, matching a catalog backed by an
/// auto-incrementing table.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    repos: RwLock<Vec<DependencyRepo>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repos(repos: impl IntoIterator<Item = DependencyRepo>) -> Self {
        Self {
            repos: RwLock::new(repos.into_iter().collect()),
        }
    }

    pub fn insert(&self, repo: DependencyRepo) {
        self.repos
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(repo);
    }

    /// Removes every record of `scheme`/`name` at `version`.
    pub fn remove(&self, scheme: &str, name: &str, version: &str) {
        self.repos
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .retain(|r| !(r.scheme == scheme && r.name == name && r.version == version));
    }

    pub fn len(&self) -> usize {
        self.repos
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DependencyCatalog for InMemoryCatalog {
    async fn list_dependency_repos(
        &self,
        opts: &ListDependencyReposOpts,
    ) -> Result<Vec<DependencyRepo>> {
        let repos = self
            .repos
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut matching: Vec<DependencyRepo> = repos
            .iter()
            .filter(|r| r.scheme == opts.scheme && r.name == opts.name)
            .cloned()
            .collect();

        if opts.newest_first {
            matching.reverse();
        }
        Ok(matching)
    }
}
