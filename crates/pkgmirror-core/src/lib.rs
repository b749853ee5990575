//! Core of pkgmirror: mirrors package registry versions into git.
//!
//! This crate holds everything that is shared between ecosystems:
//!
//! - **Package model**: [`Package`], the [`VersionedPackage`] trait and tag
//!   name validation
//! - **Boundaries**: the [`PackageSource`] and [`DependencyCatalog`] traits
//!   implemented per ecosystem and per deployment
//! - **Sync engine**: [`PackagesSyncer`], which diffs known versions against
//!   the tags of a bare repository and pushes the missing ones
//! - **Plumbing**: the [`GitRunner`] port, tarball extraction with path
//!   sanitization, and the [`RegistryClient`] used by every source
//! - **Errors**: one [`MirrorError`] taxonomy across all crates
//!
//! # Examples
//!
//! ```no_run
//! use pkgmirror_core::{
//!     CommitIdentity, InMemoryCatalog, PackageSource, PackagesSyncer, ProcessGitRunner,
//! };
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example(source: Arc<dyn PackageSource>) -> pkgmirror_core::Result<()> {
//! let syncer = PackagesSyncer::new(
//!     source,
//!     vec!["left-pad@1.3.0".to_string()],
//!     Arc::new(InMemoryCatalog::new()),
//!     Arc::new(ProcessGitRunner::new(CommitIdentity::default())),
//! );
//! syncer
//!     .clone_repo("npm/left-pad", Path::new("/var/mirrors/npm/left-pad.git"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod catalog;
pub mod error;
pub mod git;
pub mod http;
pub mod package;
pub mod resolve;
pub mod sanitize;
pub mod source;
pub mod source_registry;
pub mod syncer;

#[cfg(test)]
pub mod testing;

// Re-export commonly used types
pub use archive::extract_tar_gz;
pub use catalog::{DependencyCatalog, DependencyRepo, InMemoryCatalog, ListDependencyReposOpts};
pub use error::{MirrorError, MultiError, Result};
pub use git::{CommitIdentity, GitRunner, ProcessGitRunner};
pub use http::RegistryClient;
pub use package::{Package, Placeholder, VersionedPackage, is_valid_tag_name, sort_newest_first};
pub use resolve::VersionResolver;
pub use sanitize::sanitize_archive_path;
pub use source::PackageSource;
pub use source_registry::SourceRegistry;
pub use syncer::{LATEST_BRANCH, PackagesSyncer};
