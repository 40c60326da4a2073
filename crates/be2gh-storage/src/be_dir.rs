//! Discovery of the `.be/` directory.
//!
//! Bugs Everywhere keeps its database in a `.be/` directory at the root of
//! the version-controlled tree. Like `git`, the exporter may be started from
//! any subdirectory, so the search walks up towards the filesystem root.

use std::path::{Path, PathBuf};

use crate::error::{Result, StorageError};

/// The name of the Bugs Everywhere metadata directory.
pub const BE_DIR_NAME: &str = ".be";

/// The file holding the storage format version.
pub const VERSION_FILE: &str = "version";

/// Storage format versions whose on-disk layout this crate reads.
///
/// Older versions used a different `values` encoding.
pub const SUPPORTED_VERSIONS: &[&str] = &[
    "Bugs Everywhere Directory v1.4",
    "Bugs Everywhere Directory v1.5",
];

/// Walk up the directory tree from `start` looking for a `.be/` directory.
///
/// Returns `None` if the filesystem root is reached without finding one.
pub fn find_be_dir(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().ok()?;

    let mut current = start.as_path();
    loop {
        let candidate = current.join(BE_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) if parent != current => current = parent,
            _ => return None,
        }
    }
}

/// Like [`find_be_dir`], but returns [`StorageError::NotFound`] on failure.
pub fn find_be_dir_or_error(start: &Path) -> Result<PathBuf> {
    find_be_dir(start).ok_or_else(|| StorageError::NotFound {
        start: start.to_path_buf(),
    })
}

/// Reads and checks `.be/version`.
///
/// # Errors
///
/// Returns [`StorageError::Io`] if the file cannot be read, or
/// [`StorageError::UnsupportedVersion`] for unknown formats.
pub fn read_version(be_dir: &Path) -> Result<String> {
    let path = be_dir.join(VERSION_FILE);
    let raw = std::fs::read_to_string(&path).map_err(|e| StorageError::io(&path, e))?;
    let version = raw.trim().to_string();
    if SUPPORTED_VERSIONS.contains(&version.as_str()) {
        Ok(version)
    } else {
        Err(StorageError::UnsupportedVersion(version))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
