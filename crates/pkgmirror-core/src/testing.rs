//! In-memory fakes for exercising the syncer without a registry or a git
//! binary.
//!
//! Only compiled for this crate's own tests.

use crate::error::{MirrorError, Result};
use crate::git::{CommitIdentity, GitRunner};
use crate::package::{Package, VersionedPackage};
use crate::source::PackageSource;
use async_trait::async_trait;
use std::any::Any;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const FAKE_SCHEME: &str = "fake";

/// Versioned package with dotted-numeric ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeVersion {
    package: Package,
    version: String,
}

impl FakeVersion {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            package: Package::new(FAKE_SCHEME, name),
            version: version.to_string(),
        }
    }

    fn numeric_key(version: &str) -> Option<Vec<u64>> {
        version.split('.').map(|part| part.parse().ok()).collect()
    }
}

impl VersionedPackage for FakeVersion {
    fn package(&self) -> &Package {
        &self.package
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn versioned_package_syntax(&self) -> String {
        format!("{}@{}", self.package.package_syntax(), self.version)
    }

    fn compare(&self, other: &dyn VersionedPackage) -> Ordering {
        match (
            Self::numeric_key(&self.version),
            Self::numeric_key(other.version()),
        ) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => self.version.as_str().cmp(other.version()),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// What [`FakeSource::download`] does for one version.
#[derive(Debug, Clone)]
pub enum FakeDownload {
    /// Write these `(relative path, contents)` files.
    Files(Vec<(String, String)>),
    NotFound,
    Fail(String),
}

/// Package source backed by a table of canned downloads.
///
/// Versions without an entry download a single `README` containing the
/// versioned package syntax.
#[derive(Debug, Default)]
pub struct FakeSource {
    downloads: Mutex<HashMap<String, FakeDownload>>,
    invalid_versions: Mutex<HashSet<String>>,
    downloaded: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_download(&self, version: &str, download: FakeDownload) {
        self.downloads
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(version.to_string(), download);
    }

    /// Makes `parse_versioned_package_from_name_and_version` reject `version`.
    pub fn reject_version(&self, version: &str) {
        self.invalid_versions
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(version.to_string());
    }

    /// Versions passed to `download`, in call order.
    pub fn downloaded(&self) -> Vec<String> {
        self.downloaded
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

#[async_trait]
impl PackageSource for FakeSource {
    fn scheme(&self) -> &'static str {
        FAKE_SCHEME
    }

    async fn download(&self, dir: &Path, dep: &dyn VersionedPackage) -> Result<()> {
        self.downloaded
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(dep.version().to_string());

        let download = self
            .downloads
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(dep.version())
            .cloned()
            .unwrap_or_else(|| {
                FakeDownload::Files(vec![("README".into(), dep.versioned_package_syntax())])
            });

        match download {
            FakeDownload::Files(files) => {
                for (path, contents) in files {
                    let target = crate::sanitize::sanitize_archive_path(&path, dir);
                    if let Some(target) = target {
                        if let Some(parent) = target.parent() {
                            std::fs::create_dir_all(parent)?;
                        }
                        std::fs::write(target, contents)?;
                    }
                }
                Ok(())
            }
            FakeDownload::NotFound => Err(MirrorError::not_found(dep.versioned_package_syntax())),
            FakeDownload::Fail(message) => Err(MirrorError::Archive {
                package: dep.versioned_package_syntax(),
                message,
            }),
        }
    }

    fn parse_versioned_package_from_name_and_version(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Box<dyn VersionedPackage>> {
        let rejected = self
            .invalid_versions
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .contains(version);
        if rejected || version.is_empty() {
            return Err(MirrorError::parse(version, "invalid fake version"));
        }
        Ok(Box::new(FakeVersion::new(name, version)))
    }

    fn parse_versioned_package_from_configuration(
        &self,
        dep: &str,
    ) -> Result<Box<dyn VersionedPackage>> {
        match dep.split_once('@') {
            Some((name, version)) if !name.is_empty() && !version.is_empty() => {
                Ok(Box::new(FakeVersion::new(name, version)))
            }
            _ => Err(MirrorError::parse(dep, "expected name@version")),
        }
    }

    fn parse_package_from_repo_name(&self, repo_name: &str) -> Result<Package> {
        match repo_name.strip_prefix("fake/") {
            Some(name) if !name.is_empty() => Ok(Package::new(FAKE_SCHEME, name)),
            _ => Err(MirrorError::parse(repo_name, "not a fake repository")),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Simulated repository state held by [`FakeGit`].
#[derive(Debug, Default, Clone)]
pub struct FakeRepo {
    pub bare: bool,
    pub head: Option<String>,
    pub committed: bool,
    pub tags: BTreeSet<String>,
    pub branches: BTreeMap<String, String>,
    pub remotes: BTreeMap<String, PathBuf>,
}

/// One recorded [`FakeGit::run`] call.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub dir: PathBuf,
    pub args: Vec<String>,
    pub author: String,
}

/// [`GitRunner`] that simulates the handful of git commands the syncer uses.
#[derive(Debug, Default)]
pub struct FakeGit {
    identity: CommitIdentity,
    repos: Mutex<HashMap<PathBuf, FakeRepo>>,
    invocations: Mutex<Vec<Invocation>>,
    failures: Mutex<Vec<Vec<String>>>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every command whose arguments start with `prefix` fail.
    pub fn fail_on(&self, prefix: &[&str]) {
        self.failures
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(prefix.iter().map(|s| (*s).to_string()).collect());
    }

    pub fn repo(&self, dir: &Path) -> Option<FakeRepo> {
        self.repos
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(dir)
            .cloned()
    }

    pub fn tags(&self, dir: &Path) -> Vec<String> {
        self.repo(dir)
            .map(|r| r.tags.into_iter().collect())
            .unwrap_or_default()
    }

    pub fn branch(&self, dir: &Path, name: &str) -> Option<String> {
        self.repo(dir).and_then(|r| r.branches.get(name).cloned())
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Invocations whose arguments start with `prefix`.
    pub fn invocations_of(&self, prefix: &[&str]) -> Vec<Invocation> {
        self.invocations()
            .into_iter()
            .filter(|i| i.args.len() >= prefix.len() && i.args.iter().zip(prefix).all(|(a, p)| a == p))
            .collect()
    }

    fn fail(args: &[&str], message: &str) -> MirrorError {
        MirrorError::Command {
            args: args.iter().map(|s| (*s).to_string()).collect(),
            output: message.to_string(),
            source: None,
        }
    }

    fn execute(
        repos: &mut HashMap<PathBuf, FakeRepo>,
        dir: &Path,
        args: &[&str],
    ) -> std::result::Result<String, String> {
        if let ["--bare", "init"] | ["init", "--bare"] = args {
            repos.entry(dir.to_path_buf()).or_default().bare = true;
            return Ok(String::new());
        }
        if let ["init"] = args {
            repos.entry(dir.to_path_buf()).or_default();
            return Ok(String::new());
        }

        let repo = repos
            .get(dir)
            .cloned()
            .ok_or_else(|| "fatal: not a git repository".to_string())?;
        let mut updated = repo.clone();

        let output = match args {
            ["symbolic-ref", "HEAD", target] => {
                updated.head = Some((*target).to_string());
                String::new()
            }
            ["add", "."] => String::new(),
            ["commit", ..] => {
                updated.committed = true;
                String::new()
            }
            ["tag"] => repo.tags.iter().map(|t| format!("{t}\n")).collect(),
            ["tag", "-d", name] => {
                if !updated.tags.remove(*name) {
                    return Err(format!("error: tag '{name}' not found."));
                }
                String::new()
            }
            ["tag", "-m", _, name] => {
                if !repo.committed {
                    return Err("fatal: Failed to resolve 'HEAD' as a valid ref.".into());
                }
                updated.tags.insert((*name).to_string());
                String::new()
            }
            ["remote", "add", name, url] => {
                updated
                    .remotes
                    .insert((*name).to_string(), PathBuf::from(url));
                String::new()
            }
            ["push", "--no-verify", "--force", remote, "--tags"] => {
                let target = repo
                    .remotes
                    .get(*remote)
                    .cloned()
                    .ok_or_else(|| format!("fatal: '{remote}' does not appear to be a git repository"))?;
                let remote_repo = repos
                    .get_mut(&target)
                    .ok_or_else(|| format!("fatal: '{}' does not exist", target.display()))?;
                remote_repo.tags.extend(repo.tags.iter().cloned());
                String::new()
            }
            ["branch", "--force", "-D", name] => {
                if updated.branches.remove(*name).is_none() {
                    return Err(format!("error: branch '{name}' not found."));
                }
                String::new()
            }
            ["branch", "--force", name, start] => {
                if !repo.tags.contains(*start) {
                    return Err(format!("fatal: not a valid object name: '{start}'"));
                }
                updated
                    .branches
                    .insert((*name).to_string(), (*start).to_string());
                String::new()
            }
            ["remote", "show", _] => "* remote ./\n".to_string(),
            other => return Err(format!("fake git: unsupported command {other:?}")),
        };

        repos.insert(dir.to_path_buf(), updated);
        Ok(output)
    }
}

#[async_trait]
impl GitRunner for FakeGit {
    async fn run(&self, dir: &Path, args: &[&str], dep: &dyn VersionedPackage) -> Result<String> {
        self.invocations
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(Invocation {
                dir: dir.to_path_buf(),
                args: args.iter().map(|s| (*s).to_string()).collect(),
                author: CommitIdentity::author_name(dep),
            });

        let injected = self
            .failures
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .any(|prefix| prefix.len() <= args.len() && prefix.iter().zip(args).all(|(p, a)| p == a));
        if injected {
            return Err(Self::fail(args, "injected failure"));
        }

        let mut repos = self.repos.lock().unwrap_or_else(|p| p.into_inner());
        Self::execute(&mut repos, dir, args).map_err(|message| Self::fail(args, &message))
    }

    fn identity(&self) -> &CommitIdentity {
        &self.identity
    }
}
