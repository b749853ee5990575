//! npm ecosystem support for pkgmirror.
//!
//! Parses npm package names and versions, orders versions by npm semver and
//! downloads package tarballs from the npm registry.

pub mod error;
pub mod parser;
pub mod registry;
pub mod source;
pub mod types;

pub use error::{NpmError, Result};
pub use parser::{parse_dependency, parse_repo_name};
pub use registry::NpmRegistry;
pub use source::NpmSource;
pub use types::{NPM_SCHEME, NpmVersionedPackage, parse_package_name};
