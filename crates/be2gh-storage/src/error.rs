//! Storage error types.

use std::path::PathBuf;

/// Errors that can occur while reading Bugs Everywhere storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No `.be` directory exists at or above the start directory.
    #[error("no .be directory found in {} or any parent", start.display())]
    NotFound {
        /// Directory the search started from.
        start: PathBuf,
    },

    /// The `.be/version` file names a storage format we cannot read.
    #[error("unsupported Bugs Everywhere storage version: {0:?}")]
    UnsupportedVersion(String),

    /// A file or directory could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The path being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A `values` file is not valid JSON.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        /// The `values` file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// A `values` file lacks a property the export requires.
    #[error("{} has no {field:?} property", path.display())]
    MissingProperty {
        /// The `values` file.
        path: PathBuf,
        /// The missing property name.
        field: &'static str,
    },

    /// A timestamp property is not in the BE date format.
    #[error("invalid date {value:?} in {}: {source}", path.display())]
    InvalidDate {
        /// The `values` file.
        path: PathBuf,
        /// The raw timestamp.
        value: String,
        /// Underlying chrono error.
        source: chrono::ParseError,
    },
}

/// Convenience alias used throughout the storage crate.
pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// Wraps an I/O error with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this is a [`StorageError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
