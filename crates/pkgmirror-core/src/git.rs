//! Git command execution with a deterministic identity.
//!
//! Every git subcommand the syncer issues goes through a [`GitRunner`]. The
//! process-backed runner clears the child environment and sets the author and
//! committer identity and dates from a [`CommitIdentity`], so the same package
//! contents always produce the same commit and tag object ids, on any machine.

use crate::error::{MirrorError, Result};
use crate::package::VersionedPackage;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Default commit date for every mirrored commit and tag.
pub const DEFAULT_COMMIT_DATE: &str = "Thu Apr 8 14:24:52 2021 +0200";

/// Default author/committer email.
pub const DEFAULT_COMMIT_EMAIL: &str = "mirror@pkgmirror.invalid";

/// Email and date stamped on every commit the mirror creates.
///
/// Process-wide configuration; the author name is derived per package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub email: String,
    pub date: String,
}

impl Default for CommitIdentity {
    fn default() -> Self {
        Self {
            email: DEFAULT_COMMIT_EMAIL.to_string(),
            date: DEFAULT_COMMIT_DATE.to_string(),
        }
    }
}

impl CommitIdentity {
    /// Author name for commits of `dep`, e.g. `left-pad@1.3.0 authors`.
    pub fn author_name(dep: &dyn VersionedPackage) -> String {
        format!("{} authors", dep.versioned_package_syntax())
    }

    /// Complete environment for a git child process acting as `dep`.
    pub fn env(&self, dep: &dyn VersionedPackage) -> Vec<(&'static str, String)> {
        let name = Self::author_name(dep);
        vec![
            ("EMAIL", self.email.clone()),
            ("GIT_AUTHOR_NAME", name.clone()),
            ("GIT_AUTHOR_EMAIL", self.email.clone()),
            ("GIT_AUTHOR_DATE", self.date.clone()),
            ("GIT_COMMITTER_NAME", name),
            ("GIT_COMMITTER_EMAIL", self.email.clone()),
            ("GIT_COMMITTER_DATE", self.date.clone()),
        ]
    }
}

/// Runs one git subcommand in a working directory, acting as `dep`.
///
/// Returns the command's standard output.
///
/// # Errors
///
/// Returns [`MirrorError::Command`] with the full argument list and the
/// combined stdout/stderr when git cannot be started or exits non-zero.
#[async_trait]
pub trait GitRunner: Send + Sync {
    async fn run(&self, dir: &Path, args: &[&str], dep: &dyn VersionedPackage) -> Result<String>;

    /// Identity stamped on commits; the syncer needs the date for `--date`.
    fn identity(&self) -> &CommitIdentity;
}

/// [`GitRunner`] backed by the system `git` binary.
///
/// Children are spawned with `kill_on_drop`, so dropping an in-flight `run`
/// future (for example on cancellation) terminates the subprocess.
#[derive(Debug, Clone)]
pub struct ProcessGitRunner {
    binary: PathBuf,
    identity: CommitIdentity,
    search_path: Option<OsString>,
}

impl ProcessGitRunner {
    pub fn new(identity: CommitIdentity) -> Self {
        Self {
            binary: PathBuf::from("git"),
            identity,
            search_path: std::env::var_os("PATH"),
        }
    }

    /// Uses a specific git executable instead of `git` from `PATH`.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }
}

#[async_trait]
impl GitRunner for ProcessGitRunner {
    async fn run(&self, dir: &Path, args: &[&str], dep: &dyn VersionedPackage) -> Result<String> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args).current_dir(dir);

        // Nothing from the calling environment (HOME, XDG_CONFIG_HOME, GIT_*)
        // may influence the objects we create.
        cmd.env_clear();
        if let Some(path) = &self.search_path {
            cmd.env("PATH", path);
        }
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd.env("GIT_CONFIG_NOSYSTEM", "1");
        for (key, value) in self.identity.env(dep) {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let command_line = || {
            std::iter::once(self.binary.display().to_string())
                .chain(args.iter().map(|a| (*a).to_string()))
                .collect::<Vec<_>>()
        };

        tracing::debug!(dir = %dir.display(), args = ?args, "running git");

        let output = cmd.output().await.map_err(|e| MirrorError::Command {
            args: command_line(),
            output: String::new(),
            source: Some(e),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MirrorError::Command {
                args: command_line(),
                output: format!("{}{}", stdout, stderr).trim().to_string(),
                source: None,
            });
        }

        Ok(stdout)
    }

    fn identity(&self) -> &CommitIdentity {
        &self.identity
    }
}

/// Splits `git tag` output into tag names.
pub fn parse_tag_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
