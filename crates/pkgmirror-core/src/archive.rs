//! Gzipped tarball extraction.
//!
//! npm tarballs, Python source distributions and `.crate` files are all
//! `.tar.gz` archives with a single top-level directory, so one extractor
//! serves every ecosystem. Entries are filtered through
//! [`sanitize_archive_path`] and only regular files are written; links,
//! devices and directory entries are skipped.

use crate::error::{MirrorError, Result};
use crate::sanitize::sanitize_archive_path;
use flate2::read::GzDecoder;
use std::fs;
use std::io;
use std::path::Path;
use tar::Archive;

/// Extracts a `.tar.gz` archive into `dest`.
///
/// `strip_components` leading path segments are removed from every entry
/// first (like `tar --strip-components`); entries with fewer segments are
/// skipped. `package` only labels errors.
///
/// Returns the number of files written.
pub fn extract_tar_gz(
    data: &[u8],
    dest: &Path,
    strip_components: usize,
    package: &str,
) -> Result<usize> {
    let invalid = |message: String| MirrorError::Archive {
        package: package.to_string(),
        message,
    };

    let mut archive = Archive::new(GzDecoder::new(data));
    let entries = archive
        .entries()
        .map_err(|e| invalid(format!("invalid tarball: {}", e)))?;

    let mut written = 0;
    for entry in entries {
        let mut entry = entry.map_err(|e| invalid(format!("invalid tarball entry: {}", e)))?;

        if !entry.header().entry_type().is_file() {
            continue;
        }

        let raw_path = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        let Some(relative) = strip_leading(&raw_path, strip_components) else {
            continue;
        };
        let Some(target) = sanitize_archive_path(relative, dest) else {
            tracing::debug!(entry = %raw_path, "skipping archive entry");
            continue;
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(&target)?;
        io::copy(&mut entry, &mut file)
            .map_err(|e| invalid(format!("failed to read {}: {}", raw_path, e)))?;

        let executable = entry.header().mode().is_ok_and(|mode| mode & 0o111 != 0);
        set_mode(&target, executable)?;

        written += 1;
    }

    Ok(written)
}

/// Removes `count` leading segments. Absolute paths are returned untouched so
/// that the sanitizer still sees (and rejects) them.
fn strip_leading(path: &str, count: usize) -> Option<&str> {
    if count == 0 || path.starts_with('/') {
        return Some(path);
    }
    let mut rest = path;
    for _ in 0..count {
        let (_, tail) = rest.split_once('/')?;
        rest = tail;
    }
    Some(rest)
}

// Normalized so that commits do not depend on the packer's umask.
#[cfg(unix)]
fn set_mode(path: &Path, executable: bool) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = if executable { 0o755 } else { 0o644 };
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _executable: bool) -> Result<()> {
    Ok(())
}
