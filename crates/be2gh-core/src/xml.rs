//! Typed records read from a Bugs Everywhere XML export.
//!
//! Every `<bug>` element is read into either a [`TargetRecord`] (when its
//! severity is `target`) or a [`BugRecord`]. Child elements are looked up
//! by name once, here, so that the model never deals with raw XML nodes.

use chrono::{DateTime, Utc};
use roxmltree::{Document, Node};

use crate::date::parse_be_date;
use crate::error::{ParseError, Result};

/// Severity value that marks a bug record as a milestone target.
pub const TARGET_SEVERITY: &str = "target";

/// Extra-string prefix linking a bug to the target it blocks.
pub const BLOCKS_PREFIX: &str = "BLOCKS:";

/// A `<bug>` element whose severity is `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRecord {
    pub uuid: String,
    pub summary: String,
    pub status: String,
    pub created: DateTime<Utc>,
}

/// A `<comment>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub uuid: String,
    pub date: DateTime<Utc>,
    pub body: String,
}

/// A `<bug>` element that is an ordinary bug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugRecord {
    pub uuid: String,
    pub short_name: String,
    pub severity: String,
    pub status: String,
    pub reporter: String,
    pub creator: String,
    pub created: DateTime<Utc>,
    pub summary: String,
    /// All `<extra-string>` values in document order.
    pub extra_strings: Vec<String>,
    /// All `<comment>` children in document order.
    pub comments: Vec<CommentRecord>,
}

impl BugRecord {
    /// Returns the target UUIDs named by `BLOCKS:` extra-strings, in order.
    pub fn blocked_targets(&self) -> impl Iterator<Item = &str> {
        self.extra_strings
            .iter()
            .filter_map(|s| s.strip_prefix(BLOCKS_PREFIX))
    }
}

/// One `<bug>` element, classified by severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Target(TargetRecord),
    Bug(BugRecord),
}

/// Reads every `<bug>` element of the document's `<bugs>` element.
///
/// Records are returned in document order.
///
/// # Errors
///
/// Fails on malformed XML, a missing `<bugs>` element, a missing required
/// field, or a date that is not in the BE format.
pub fn read_records(xml: &str) -> Result<Vec<Record>> {
    let doc = Document::parse(xml)?;
    let bugs = doc
        .descendants()
        .find(|n| n.has_tag_name("bugs"))
        .ok_or(ParseError::MissingRoot)?;

    bugs.children()
        .filter(|n| n.has_tag_name("bug"))
        .map(read_bug_element)
        .collect()
}

fn read_bug_element(node: Node<'_, '_>) -> Result<Record> {
    let mut fields = Fields::new(node, "bug");
    let uuid = fields.required("uuid")?;
    fields.uuid = Some(uuid.clone());

    if fields.required("severity")? == TARGET_SEVERITY {
        return Ok(Record::Target(TargetRecord {
            summary: fields.required("summary")?,
            status: fields.required("status")?,
            created: fields.date("created")?,
            uuid,
        }));
    }

    let comments = node
        .children()
        .filter(|n| n.has_tag_name("comment"))
        .map(|c| read_comment_element(c, &uuid))
        .collect::<Result<Vec<_>>>()?;

    Ok(Record::Bug(BugRecord {
        short_name: fields.required("short-name")?,
        severity: fields.required("severity")?,
        status: fields.required("status")?,
        reporter: fields.required("reporter")?,
        creator: fields.required("creator")?,
        created: fields.date("created")?,
        summary: fields.required("summary")?,
        extra_strings: fields.all("extra-string"),
        comments,
        uuid,
    }))
}

fn read_comment_element(node: Node<'_, '_>, bug_uuid: &str) -> Result<CommentRecord> {
    let mut fields = Fields::new(node, "comment");
    fields.uuid = Some(bug_uuid.to_string());
    Ok(CommentRecord {
        uuid: fields.required("uuid")?,
        date: fields.date("date")?,
        body: fields.required("body")?,
    })
}

/// Named child lookup on one element, with error context.
struct Fields<'a, 'input> {
    node: Node<'a, 'input>,
    element: &'static str,
    uuid: Option<String>,
}

impl<'a, 'input> Fields<'a, 'input> {
    fn new(node: Node<'a, 'input>, element: &'static str) -> Self {
        Self {
            node,
            element,
            uuid: None,
        }
    }

    fn child(&self, field: &str) -> Option<Node<'a, 'input>> {
        self.node.children().find(|c| c.has_tag_name(field))
    }

    fn required(&self, field: &'static str) -> Result<String> {
        self.child(field)
            .map(text_content)
            .ok_or_else(|| ParseError::MissingField {
                element: self.element,
                field,
                uuid: self.uuid.clone(),
            })
    }

    fn date(&self, field: &'static str) -> Result<DateTime<Utc>> {
        let value = self.required(field)?;
        parse_be_date(&value).map_err(|source| ParseError::InvalidDate {
            field,
            value,
            uuid: self.uuid.clone(),
            source,
        })
    }

    fn all(&self, field: &str) -> Vec<String> {
        self.node
            .children()
            .filter(|c| c.has_tag_name(field))
            .map(text_content)
            .collect()
    }
}

/// Concatenated text of all descendant text nodes.
fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
