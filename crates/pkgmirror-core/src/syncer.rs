//! Mirrors every known version of one package into a bare git repository.
//!
//! Each version becomes one tag pointing at a single root commit that holds
//! the extracted package archive. The `latest` branch moves to the greatest
//! version cloned by the most recent pass that cloned anything. Commits are created with a fixed identity and date, so
//! mirrors built independently from the same archives are byte-identical.

use crate::catalog::DependencyCatalog;
use crate::error::{MirrorError, MultiError, Result};
use crate::git::{GitRunner, parse_tag_list};
use crate::package::{VersionedPackage, sort_newest_first};
use crate::resolve::VersionResolver;
use crate::source::PackageSource;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Branch that tracks the greatest mirrored version.
pub const LATEST_BRANCH: &str = "latest";

const REMOTE_SHOW_ARGS: &[&str] = &["remote", "show", "./"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PushOutcome {
    Pushed,
    /// The registry has nothing for this version.
    NotFound,
}

/// Syncs package repositories of one ecosystem.
///
/// A pass is sequential: versions are downloaded and pushed one at a time.
/// Callers that want parallelism run several syncers (or several passes of
/// one syncer on different repositories) concurrently; a single bare
/// repository must only have one writer at a time.
pub struct PackagesSyncer {
    type_name: String,
    source: Arc<dyn PackageSource>,
    resolver: VersionResolver,
    git: Arc<dyn GitRunner>,
    placeholder: Box<dyn VersionedPackage>,
    cancel: CancellationToken,
}

impl PackagesSyncer {
    pub fn new(
        source: Arc<dyn PackageSource>,
        config_deps: Vec<String>,
        catalog: Arc<dyn DependencyCatalog>,
        git: Arc<dyn GitRunner>,
    ) -> Self {
        let type_name = format!("{}_packages", source.scheme());
        let placeholder = source.placeholder();
        let resolver = VersionResolver::new(config_deps, Arc::clone(&source), catalog);

        Self {
            type_name,
            source,
            resolver,
            git,
            placeholder,
            cancel: CancellationToken::new(),
        }
    }

    /// Ties this syncer's passes to `token`; cancelling it aborts the
    /// in-flight pass.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Syncer kind, e.g. `npm_packages`.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn source(&self) -> &Arc<dyn PackageSource> {
        &self.source
    }

    /// Package repositories have no upstream to probe, so every name is
    /// considered cloneable.
    pub fn is_cloneable(&self, _repo_name: &str) -> Result<()> {
        Ok(())
    }

    /// Arguments of the git command that describes the mirror's remote.
    pub fn remote_show_args(&self) -> &'static [&'static str] {
        REMOTE_SHOW_ARGS
    }

    /// Creates the bare repository at `bare_dir` and runs a first [`fetch`].
    ///
    /// `HEAD` is pointed at the `latest` branch so that a clone of the mirror
    /// checks out the greatest version. Errors from the fetch are returned
    /// unchanged.
    ///
    /// [`fetch`]: Self::fetch
    pub async fn clone_repo(&self, repo_name: &str, bare_dir: &Path) -> Result<()> {
        self.until_cancelled(repo_name, self.init_bare(bare_dir))
            .await?;
        self.fetch(repo_name, bare_dir).await
    }

    async fn init_bare(&self, bare_dir: &Path) -> Result<()> {
        tokio::fs::create_dir_all(bare_dir).await?;

        let placeholder = self.placeholder.as_ref();
        self.git
            .run(bare_dir, &["--bare", "init"], placeholder)
            .await?;
        let head = format!("refs/heads/{LATEST_BRANCH}");
        self.git
            .run(bare_dir, &["symbolic-ref", "HEAD", &head], placeholder)
            .await?;
        Ok(())
    }

    /// Brings the bare repository at `bare_dir` up to date with the current
    /// set of known versions.
    ///
    /// # Errors
    ///
    /// - the repository name or any candidate version fails to parse (nothing
    ///   is downloaded in that case)
    /// - the catalog or the initial tag listing fails
    /// - one or more versions failed to download or push; the rest of the
    ///   pass still ran, but stale tags are not pruned
    /// - [`MirrorError::Cancelled`] if the cancellation token fired
    pub async fn fetch(&self, repo_name: &str, bare_dir: &Path) -> Result<()> {
        self.until_cancelled(repo_name, self.sync(repo_name, bare_dir))
            .await
    }

    /// Drops `work` as soon as the cancellation token fires.
    async fn until_cancelled<T>(
        &self,
        repo_name: &str,
        work: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                tracing::warn!(repo = %repo_name, "sync cancelled");
                Err(MirrorError::Cancelled)
            }
            result = work => result,
        }
    }

    async fn sync(&self, repo_name: &str, bare_dir: &Path) -> Result<()> {
        let package = self.source.parse_package_from_repo_name(repo_name)?;
        let name = package.package_syntax();

        let versions = self.resolver.versions(name).await?;

        let mut parse_errors = MultiError::new();
        let mut candidates: Vec<Box<dyn VersionedPackage>> = Vec::with_capacity(versions.len());
        for version in &versions {
            match self
                .source
                .parse_versioned_package_from_name_and_version(name, version)
            {
                Ok(dep) => candidates.push(dep),
                Err(e) => parse_errors.push(e),
            }
        }
        parse_errors.into_result()?;

        sort_newest_first(&mut candidates);

        let placeholder = self.placeholder.as_ref();
        let listing = self.git.run(bare_dir, &["tag"], placeholder).await?;
        let existing: BTreeSet<String> = parse_tag_list(&listing).into_iter().collect();

        tracing::debug!(
            repo = %repo_name,
            candidates = candidates.len(),
            existing = existing.len(),
            "syncing package versions"
        );

        let mut errors = MultiError::new();
        let mut present: HashSet<String> = existing.iter().cloned().collect();
        let mut attempted = HashSet::new();
        let mut cloned: Vec<&dyn VersionedPackage> = Vec::new();

        for dep in &candidates {
            let tag = dep.git_tag();
            if present.contains(&tag) || !attempted.insert(tag.clone()) {
                continue;
            }

            match self.push_version_tag(bare_dir, dep.as_ref()).await {
                Ok(PushOutcome::Pushed) => {
                    tracing::info!(dependency = %dep.versioned_package_syntax(), %tag, "pushed tag");
                    present.insert(tag);
                    cloned.push(dep.as_ref());
                }
                Ok(PushOutcome::NotFound) => {}
                Err(e) => errors.push(e.context(format!(
                    "error pushing dependency {:?}",
                    dep.versioned_package_syntax()
                ))),
            }
        }

        // Candidates are sorted, so the first version cloned in this pass is
        // the greatest of them.
        if let Some(&latest) = cloned.first() {
            let tag = latest.git_tag();
            let result = self
                .git
                .run(bare_dir, &["branch", "--force", LATEST_BRANCH, &tag], latest)
                .await;
            if let Err(e) = result {
                errors.push(e);
                return errors.into_result();
            }
        }

        errors.into_result()?;

        let wanted: HashSet<String> = candidates.iter().map(|d| d.git_tag()).collect();
        for tag in existing.iter().filter(|tag| !wanted.contains(*tag)) {
            if let Err(e) = self.git.run(bare_dir, &["tag", "-d", tag], placeholder).await {
                tracing::error!(%tag, error = %e, "failed to delete git tag");
            }
        }

        if candidates.is_empty() {
            // The branch may never have been created.
            if let Err(e) = self
                .git
                .run(bare_dir, &["branch", "--force", "-D", LATEST_BRANCH], placeholder)
                .await
            {
                tracing::debug!(error = %e, "no latest branch to delete");
            }
        }

        Ok(())
    }

    /// Downloads `dep` into a scratch directory, commits it and pushes its
    /// tag into `bare_dir`.
    ///
    /// The scratch directory is removed when this returns or when the future
    /// is dropped.
    async fn push_version_tag(
        &self,
        bare_dir: &Path,
        dep: &dyn VersionedPackage,
    ) -> Result<PushOutcome> {
        let work_dir = tempfile::Builder::new()
            .prefix(&self.type_name)
            .tempdir()?;
        let dir = work_dir.path();

        match self.source.download(dir, dep).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    dependency = %dep.versioned_package_syntax(),
                    error = %e,
                    "error during dependency download"
                );
                return Ok(PushOutcome::NotFound);
            }
            Err(e) => return Err(e),
        }

        let message = dep.versioned_package_syntax();
        let tag = dep.git_tag();
        let date = self.git.identity().date.clone();
        let origin = std::path::absolute(bare_dir)?;
        let origin = origin.to_string_lossy();

        let steps: [&[&str]; 6] = [
            &["init"],
            &["add", "."],
            &["commit", "--no-verify", "-m", message.as_str(), "--date", date.as_str()],
            &["tag", "-m", message.as_str(), tag.as_str()],
            &["remote", "add", "origin", &*origin],
            &["push", "--no-verify", "--force", "origin", "--tags"],
        ];
        for args in steps {
            self.git.run(dir, args, dep).await?;
        }

        Ok(PushOutcome::Pushed)
    }
}
