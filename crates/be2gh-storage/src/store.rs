//! [`BeStore`] -- read-only access to a Bugs Everywhere database.
//!
//! On-disk layout (format v1.4):
//!
//! ```text
//! .be/
//!   version
//!   <bugdir-uuid>/
//!     settings
//!     bugs/
//!       <bug-uuid>/
//!         values
//!         comments/
//!           <comment-uuid>/
//!             values
//!             body
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use be2gh_core::date::parse_be_date;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::be_dir::{find_be_dir_or_error, read_version};
use crate::error::{Result, StorageError};
use crate::short_name::{join, unique_prefix};
use crate::values::{BugValues, CommentValues, read_values};

const BUGS_DIR: &str = "bugs";
const COMMENTS_DIR: &str = "comments";
const VALUES_FILE: &str = "values";
const BODY_FILE: &str = "body";

/// A comment as loaded from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredComment {
    pub uuid: String,
    pub short_name: String,
    pub in_reply_to: Option<String>,
    pub author: Option<String>,
    pub date: DateTime<Utc>,
    pub content_type: String,
    pub body: String,
}

/// A bug (or target) as loaded from storage, with its comments in date order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBug {
    pub uuid: String,
    pub short_name: String,
    pub severity: String,
    pub status: String,
    pub assigned: Option<String>,
    pub reporter: Option<String>,
    pub creator: Option<String>,
    pub created: DateTime<Utc>,
    pub summary: String,
    pub extra_strings: Vec<String>,
    pub comments: Vec<StoredComment>,
}

/// Handle on a `.be` directory.
#[derive(Debug, Clone)]
pub struct BeStore {
    be_dir: PathBuf,
    version: String,
}

impl BeStore {
    /// Locates the `.be` directory at or above `start` and checks its version.
    pub fn open(start: &Path) -> Result<Self> {
        let be_dir = find_be_dir_or_error(start)?;
        let version = read_version(&be_dir)?;
        info!(path = %be_dir.display(), %version, "opened Bugs Everywhere storage");
        Ok(Self { be_dir, version })
    }

    pub fn be_dir(&self) -> &Path {
        &self.be_dir
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// UUIDs of every bug directory root, sorted.
    pub fn bugdir_uuids(&self) -> Result<Vec<String>> {
        list_dirs(&self.be_dir)
    }

    /// Loads every bug of every bug directory, oldest first.
    ///
    /// Bugs with identical creation times keep their directory order.
    pub fn load_bugs(&self) -> Result<Vec<StoredBug>> {
        let bugdirs = self.bugdir_uuids()?;
        let bugdir_refs: Vec<&str> = bugdirs.iter().map(String::as_str).collect();

        let mut bugs = Vec::new();
        for bugdir in &bugdirs {
            let bugdir_short = unique_prefix(bugdir, &bugdir_refs);
            let bugs_path = self.be_dir.join(bugdir).join(BUGS_DIR);
            let uuids = list_dirs(&bugs_path)?;
            let uuid_refs: Vec<&str> = uuids.iter().map(String::as_str).collect();
            debug!(bugdir = %bugdir, count = uuids.len(), "loading bugs");

            for uuid in &uuids {
                let short_name = join(bugdir_short, unique_prefix(uuid, &uuid_refs));
                bugs.push(load_bug(&bugs_path.join(uuid), uuid, short_name)?);
            }
        }

        bugs.sort_by_key(|b| b.created);
        info!(count = bugs.len(), "loaded bugs");
        Ok(bugs)
    }
}

fn load_bug(dir: &Path, uuid: &str, short_name: String) -> Result<StoredBug> {
    let values_path = dir.join(VALUES_FILE);
    let values: BugValues = read_values(&values_path)?;
    let created = required_date(&values_path, "time", values.time.as_deref())?;
    let comments = load_comments(&dir.join(COMMENTS_DIR), &short_name)?;

    Ok(StoredBug {
        uuid: uuid.to_string(),
        short_name,
        severity: values.severity,
        status: values.status,
        assigned: values.assigned,
        reporter: values.reporter,
        creator: values.creator,
        created,
        summary: values.summary.unwrap_or_default(),
        extra_strings: values.extra_strings,
        comments,
    })
}

fn load_comments(dir: &Path, bug_short: &str) -> Result<Vec<StoredComment>> {
    let uuids = list_dirs(dir)?;
    let uuid_refs: Vec<&str> = uuids.iter().map(String::as_str).collect();

    let mut comments = Vec::with_capacity(uuids.len());
    for uuid in &uuids {
        let comment_dir = dir.join(uuid);
        let values_path = comment_dir.join(VALUES_FILE);
        let values: CommentValues = read_values(&values_path)?;
        let date = required_date(&values_path, "Date", values.date.as_deref())?;
        comments.push(StoredComment {
            uuid: uuid.clone(),
            short_name: join(bug_short, unique_prefix(uuid, &uuid_refs)),
            in_reply_to: values.in_reply_to,
            author: values.author,
            date,
            content_type: values.content_type,
            body: read_body(&comment_dir.join(BODY_FILE))?,
        });
    }
    comments.sort_by_key(|c| c.date);
    Ok(comments)
}

/// Comment bodies are optional on disk; a missing file is an empty body.
fn read_body(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(body) => Ok(body),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(StorageError::io(path, e)),
    }
}

fn required_date(path: &Path, field: &'static str, value: Option<&str>) -> Result<DateTime<Utc>> {
    let value = value.ok_or_else(|| StorageError::MissingProperty {
        path: path.to_path_buf(),
        field,
    })?;
    parse_be_date(value).map_err(|source| StorageError::InvalidDate {
        path: path.to_path_buf(),
        value: value.to_string(),
        source,
    })
}

/// Names of the subdirectories of `path`, sorted. A missing directory has
/// no entries.
fn list_dirs(path: &Path) -> Result<Vec<String>> {
    if !path.is_dir() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(path).map_err(|e| StorageError::io(path, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StorageError::io(path, e))?;
        let file_type = entry.file_type().map_err(|e| StorageError::io(entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => debug!(?name, "skipping non UTF-8 directory name"),
        }
    }
    names.sort();
    Ok(names)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod tests {
    use super::fixture;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn loads_bugs_sorted_with_comments() {
        let tmp = tempfile::tempdir().unwrap();
        let be = fixture::init(tmp.path());
        let later = fixture::bug(
            &be,
            "aaa11111",
            r#"{"summary": "Later bug", "time": "Fri, 03 Apr 2009 10:00:00 +0000", "status": "fixed"}"#,
        );
        fixture::bug(
            &be,
            "aaa22222",
            r#"{"summary": "Earlier bug", "time": "Wed, 01 Apr 2009 10:00:00 +0000"}"#,
        );
        fixture::comment(
            &later,
            "ccc2",
            r#"{"Author": "Bob", "Date": "Sat, 04 Apr 2009 10:00:00 +0000"}"#,
            Some("second"),
        );
        fixture::comment(
            &later,
            "bbb1",
            r#"{"Author": "Ann", "Date": "Fri, 03 Apr 2009 10:00:00 +0000"}"#,
            None,
        );

        let store = BeStore::open(tmp.path()).unwrap();
        assert_eq!(store.version(), "Bugs Everywhere Directory v1.4");
        let bugs = store.load_bugs().unwrap();

        assert_eq!(bugs.len(), 2);
        assert_eq!(bugs[0].summary, "Earlier bug");
        assert_eq!(bugs[0].status, "open");
        assert_eq!(bugs[0].severity, "minor");
        assert_eq!(bugs[0].short_name, "7f3/aaa2");
        assert_eq!(bugs[1].short_name, "7f3/aaa1");

        let comments = &bugs[1].comments;
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].uuid, "bbb1");
        assert_eq!(comments[0].body, "");
        assert_eq!(comments[0].short_name, "7f3/aaa1/bbb");
        assert_eq!(comments[1].body, "second");
    }

    #[test]
    fn bug_without_time_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let be = fixture::init(tmp.path());
        fixture::bug(&be, "aaa", r#"{"summary": "No time"}"#);

        let err = BeStore::open(tmp.path()).unwrap().load_bugs().unwrap_err();
        assert!(matches!(err, StorageError::MissingProperty { field: "time", .. }));
    }

    #[test]
    fn malformed_comment_date_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let be = fixture::init(tmp.path());
        let bug = fixture::bug(
            &be,
            "aaa",
            r#"{"summary": "x", "time": "Wed, 01 Apr 2009 10:00:00 +0000"}"#,
        );
        fixture::comment(&bug, "ccc", r#"{"Date": "2009-04-01"}"#, Some("hi"));

        let err = BeStore::open(tmp.path()).unwrap().load_bugs().unwrap_err();
        assert!(matches!(err, StorageError::InvalidDate { .. }));
    }

    #[test]
    fn empty_database_has_no_bugs() {
        let tmp = tempfile::tempdir().unwrap();
        fixture::init(tmp.path());
        let store = BeStore::open(tmp.path()).unwrap();
        assert_eq!(store.bugdir_uuids().unwrap(), vec![fixture::BUGDIR.to_string()]);
        assert!(store.load_bugs().unwrap().is_empty());
    }
}
