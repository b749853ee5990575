use dashmap::DashMap;
use std::sync::Arc;

use crate::error::{MirrorError, Result};
use crate::source::PackageSource;

/// Registry of package sources, keyed by scheme.
///
/// Used at startup to pick the source for a repository name such as
/// `npm/left-pad`: the first path segment selects the scheme.
///
/// # Examples
///
/// ```no_run
/// use pkgmirror_core::SourceRegistry;
///
/// let registry = SourceRegistry::new();
/// // registry.register(Arc::new(NpmSource::new(client)));
///
/// if let Ok(source) = registry.get_for_repo_name("npm/left-pad") {
///     println!("syncing with {}", source.scheme());
/// }
/// ```
#[derive(Default)]
pub struct SourceRegistry {
    sources: DashMap<&'static str, Arc<dyn PackageSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `source` under its scheme, replacing any previous one.
    pub fn register(&self, source: Arc<dyn PackageSource>) {
        self.sources.insert(source.scheme(), source);
    }

    pub fn get(&self, scheme: &str) -> Option<Arc<dyn PackageSource>> {
        self.sources.get(scheme).map(|s| Arc::clone(&s))
    }

    /// Selects the source for a repository name by its first path segment.
    pub fn get_for_repo_name(&self, repo_name: &str) -> Result<Arc<dyn PackageSource>> {
        let scheme = repo_name.split('/').next().unwrap_or_default();
        self.get(scheme)
            .ok_or_else(|| MirrorError::UnsupportedScheme(scheme.to_string()))
    }

    /// Registered schemes, sorted.
    pub fn schemes(&self) -> Vec<&'static str> {
        let mut schemes: Vec<_> = self.sources.iter().map(|entry| *entry.key()).collect();
        schemes.sort_unstable();
        schemes
    }
}
