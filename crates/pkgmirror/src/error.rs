use pkgmirror_core::MirrorError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the `pkgmirror` binary.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("failed to read config {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Mirror(#[from] MirrorError),
}

pub type Result<T> = std::result::Result<T, CliError>;
