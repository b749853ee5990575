//! Archive entry path validation.
//!
//! Registry archives are untrusted input. Before anything is written to disk
//! each entry path goes through [`sanitize_archive_path`], which drops entries
//! that would land outside the extraction directory ("zip slip") or inside a
//! `.git` directory, where they could plant hooks or rewrite repository config
//! in the working copy we later commit from.

use std::path::{Path, PathBuf};

/// Name of the version-control metadata directory.
pub const GIT_DIR_NAME: &str = ".git";

/// Resolves `entry` under `destination`, or returns `None` if the entry must be
/// skipped.
///
/// Rules, first match wins:
/// - trailing `/`: directory entry, skipped
/// - leading `/`: absolute path, skipped
/// - any `.git` segment: skipped
/// - resolves outside (or exactly onto) `destination`: skipped
///
/// Resolution is purely lexical; the filesystem is never consulted.
///
/// # Examples
///
/// ```
/// use pkgmirror_core::sanitize::sanitize_archive_path;
/// use std::path::Path;
///
/// let dest = Path::new("/tmp/extract");
/// assert_eq!(
///     sanitize_archive_path("src/index.js", dest),
///     Some(Path::new("/tmp/extract/src/index.js").to_path_buf())
/// );
/// assert_eq!(sanitize_archive_path("../../etc/passwd", dest), None);
/// ```
pub fn sanitize_archive_path(entry: &str, destination: &Path) -> Option<PathBuf> {
    if entry.ends_with('/') {
        return None;
    }

    if entry.starts_with('/') {
        return None;
    }

    if entry
        .split(['/', '\\'])
        .any(|segment| segment == GIT_DIR_NAME)
    {
        return None;
    }

    let mut parts: Vec<&str> = Vec::new();
    for segment in entry.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                // Popping past the root means the entry escapes `destination`.
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return None;
    }

    let mut resolved = destination.to_path_buf();
    resolved.extend(parts);
    Some(resolved)
}
