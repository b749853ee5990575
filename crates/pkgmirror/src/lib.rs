//! Mirrors package registry releases into bare git repositories.
//!
//! Each package becomes one repository (`npm/left-pad`, `python/requests`,
//! `crates/serde`) with a `v<version>` tag per mirrored release and a
//! `latest` branch at the newest one.

pub mod config;
pub mod error;
pub mod mirror;

pub use config::MirrorConfig;
pub use error::{CliError, Result};
pub use mirror::{Mirror, SyncAction};
