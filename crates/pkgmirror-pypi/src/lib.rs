//! Python ecosystem support for pkgmirror.
//!
//! Names are normalized per PEP 503, versions are ordered per PEP 440 and
//! each mirrored release is the content of its `.tar.gz` source
//! distribution on PyPI.

pub mod error;
pub mod parser;
pub mod registry;
pub mod source;
pub mod types;

pub use error::{PypiError, Result};
pub use parser::{parse_dependency, parse_repo_name};
pub use registry::PypiRegistry;
pub use source::PythonSource;
pub use types::{PYTHON_SCHEME, PythonVersionedPackage, normalize_package_name, parse_package_name};
