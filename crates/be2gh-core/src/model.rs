//! The converted, read-only view of an exported bug database.
//!
//! A [`BugDocument`] is built once from XML and never mutated afterwards:
//! targets become [`Target`]s (future GitHub milestones), every other bug
//! becomes a [`Bug`] whose earliest comment is folded into its body.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::xml::{self, BugRecord, CommentRecord, Record, TargetRecord};

/// BE status that maps to an open issue; everything else is closed.
pub const OPEN_STATUS: &str = "open";

/// BE status that additionally earns the `wontfix` label.
pub const WONTFIX_STATUS: &str = "wontfix";

/// Targets keyed by their BE UUID.
pub type TargetMap = BTreeMap<String, Target>;

// ---------------------------------------------------------------------------
// IssueState
// ---------------------------------------------------------------------------

/// Open/closed state shared by issues and milestones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    /// Maps a BE status string: only `"open"` is open.
    pub fn from_status(status: &str) -> Self {
        if status == OPEN_STATUS {
            Self::Open
        } else {
            Self::Closed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    /// First letter of the state, as shown in summaries.
    pub fn initial(&self) -> char {
        match self {
            Self::Open => 'o',
            Self::Closed => 'c',
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Target
// ---------------------------------------------------------------------------

/// A BE target, exported as a GitHub milestone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    title: String,
    created_at: DateTime<Utc>,
    closed: bool,
}

impl Target {
    pub fn new(title: impl Into<String>, created_at: DateTime<Utc>, status: &str) -> Self {
        Self {
            title: title.into(),
            created_at,
            closed: status != OPEN_STATUS,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn closed(&self) -> bool {
        self.closed
    }

    pub fn state(&self) -> IssueState {
        if self.closed {
            IssueState::Closed
        } else {
            IssueState::Open
        }
    }
}

impl From<TargetRecord> for Target {
    fn from(record: TargetRecord) -> Self {
        Self::new(record.summary, record.created, &record.status)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

// ---------------------------------------------------------------------------
// Comment
// ---------------------------------------------------------------------------

/// A comment on a bug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    uuid: String,
    created_at: DateTime<Utc>,
    body_text: String,
}

impl Comment {
    pub fn new(uuid: impl Into<String>, created_at: DateTime<Utc>, body_text: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            created_at,
            body_text: body_text.into(),
        }
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn body_text(&self) -> &str {
        &self.body_text
    }
}

impl From<CommentRecord> for Comment {
    fn from(record: CommentRecord) -> Self {
        Self::new(record.uuid, record.date, record.body)
    }
}

// ---------------------------------------------------------------------------
// Bug
// ---------------------------------------------------------------------------

/// A BE bug, exported as a GitHub issue.
///
/// The chronologically first comment is the issue description and is
/// available as [`Bug::body`]; [`Bug::comments`] holds the rest in
/// ascending date order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bug {
    uuid: String,
    short_name: String,
    severity: String,
    status: String,
    reporter: String,
    creator: String,
    created_at: DateTime<Utc>,
    title: String,
    state: IssueState,
    labels: Vec<String>,
    body: String,
    comments: Vec<Comment>,
    milestone: Option<Target>,
}

impl Bug {
    /// Builds a bug from its XML record, resolving its milestone in `targets`.
    ///
    /// The first `BLOCKS:` marker naming a known target wins. Markers that
    /// name unknown UUIDs are skipped.
    pub fn from_record(record: BugRecord, targets: &TargetMap) -> Self {
        let milestone = record
            .blocked_targets()
            .find_map(|uuid| {
                let found = targets.get(uuid);
                if found.is_none() {
                    debug!(bug = %record.uuid, target = uuid, "BLOCKS marker names unknown target");
                }
                found
            })
            .cloned();

        let state = IssueState::from_status(&record.status);
        let labels = if record.status == WONTFIX_STATUS {
            vec![WONTFIX_STATUS.to_string()]
        } else {
            Vec::new()
        };

        let mut comments: Vec<Comment> = record.comments.into_iter().map(Comment::from).collect();
        comments.sort_by_key(|c| c.created_at);
        let (body, comments) = if comments.is_empty() {
            (String::new(), comments)
        } else {
            let first = comments.remove(0);
            (first.body_text, comments)
        };

        Self {
            uuid: record.uuid,
            short_name: record.short_name,
            severity: record.severity,
            status: record.status,
            reporter: record.reporter,
            creator: record.creator,
            created_at: record.created,
            title: record.summary,
            state,
            labels,
            body,
            comments,
            milestone,
        }
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn severity(&self) -> &str {
        &self.severity
    }

    /// The original BE status string (e.g. `fixed`, `wontfix`).
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn reporter(&self) -> &str {
        &self.reporter
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> IssueState {
        self.state
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Text of the earliest comment, or `""` if the bug has no comments.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// All comments except the earliest, oldest first.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn milestone(&self) -> Option<&Target> {
        self.milestone.as_ref()
    }
}

// ---------------------------------------------------------------------------
// BugDocument
// ---------------------------------------------------------------------------

/// Everything converted from one XML export.
#[derive(Debug, Clone)]
pub struct BugDocument {
    targets: TargetMap,
    bugs: Vec<Bug>,
}

impl BugDocument {
    /// Parses an XML export.
    ///
    /// Targets are collected first so that bugs may reference targets that
    /// appear later in the document. Bugs are sorted by creation time; bugs
    /// created at the same instant keep their document order.
    pub fn parse(xml: &str) -> Result<Self> {
        let records = xml::read_records(xml)?;

        let mut targets = TargetMap::new();
        let mut bug_records = Vec::new();
        for record in records {
            match record {
                Record::Target(t) => {
                    targets.insert(t.uuid.clone(), Target::from(t));
                }
                Record::Bug(b) => bug_records.push(b),
            }
        }

        let mut bugs: Vec<Bug> = bug_records
            .into_iter()
            .map(|record| Bug::from_record(record, &targets))
            .collect();
        bugs.sort_by_key(|b| b.created_at);

        debug!(targets = targets.len(), bugs = bugs.len(), "converted XML export");
        Ok(Self { targets, bugs })
    }

    /// Targets keyed by UUID.
    pub fn targets(&self) -> &TargetMap {
        &self.targets
    }

    /// Targets ordered by creation time.
    pub fn targets_by_creation(&self) -> Vec<&Target> {
        let mut targets: Vec<&Target> = self.targets.values().collect();
        targets.sort_by_key(|t| t.created_at);
        targets
    }

    /// Bugs ordered by creation time.
    pub fn bugs(&self) -> &[Bug] {
        &self.bugs
    }
}
