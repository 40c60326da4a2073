//! Serde views of BE `values` files.
//!
//! Each bug and comment directory holds a `values` file: a JSON object that
//! stores only properties differing from their defaults. Bug properties use
//! lowercase names; comment properties use the RFC 822 style header names
//! (`Author`, `Date`, ...).

use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, StorageError};

/// Default BE bug severity.
pub const DEFAULT_SEVERITY: &str = "minor";

/// Default BE bug status.
pub const DEFAULT_STATUS: &str = "open";

/// Default BE comment content type.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Properties of `bugs/<uuid>/values`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BugValues {
    #[serde(default = "default_severity")]
    pub severity: String,

    #[serde(default = "default_status")]
    pub status: String,

    #[serde(default)]
    pub assigned: Option<String>,

    #[serde(default)]
    pub reporter: Option<String>,

    #[serde(default)]
    pub creator: Option<String>,

    /// Creation time in BE date format.
    #[serde(default)]
    pub time: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub extra_strings: Vec<String>,
}

/// Properties of `comments/<uuid>/values`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommentValues {
    #[serde(default, rename = "Author", alias = "author")]
    pub author: Option<String>,

    #[serde(default, rename = "Date", alias = "date")]
    pub date: Option<String>,

    #[serde(
        default = "default_content_type",
        rename = "Content-type",
        alias = "content_type"
    )]
    pub content_type: String,

    #[serde(default, rename = "In-reply-to", alias = "in_reply_to")]
    pub in_reply_to: Option<String>,
}

fn default_severity() -> String {
    DEFAULT_SEVERITY.to_string()
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

/// Reads and decodes one `values` file.
///
/// An empty file decodes as an empty object (all defaults).
pub fn read_values<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
    let raw = if raw.trim().is_empty() { "{}" } else { raw.as_str() };
    serde_json::from_str(raw).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })
}
