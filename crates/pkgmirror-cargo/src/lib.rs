//! Rust crates support for pkgmirror.
//!
//! Crate names follow the crates.io publishing rules, versions are ordered
//! with the `semver` crate and each mirrored version is the content of its
//! `.crate` archive.

pub mod error;
pub mod parser;
pub mod registry;
pub mod source;
pub mod types;

pub use error::{CargoError, Result};
pub use parser::{parse_dependency, parse_repo_name};
pub use registry::CratesRegistry;
pub use source::CratesSource;
pub use types::{CRATES_SCHEME, CrateVersionedPackage, parse_package_name};
