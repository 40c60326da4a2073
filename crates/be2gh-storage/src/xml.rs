//! XML export of stored bugs.
//!
//! Produces one `<bugs>` document with a `<bug>` element per bug and nested
//! `<comment>` elements, indented two spaces per level. Optional properties
//! that are unset are left out.
//!
//! Carriage returns are written as `&#xD;` so that XML end-of-line handling
//! does not fold `\r\n` into `\n`. Characters XML 1.0 cannot carry at all
//! are replaced with U+FFFD and logged.

use std::io::{self, Write};

use be2gh_core::date::format_be_date;
use tracing::warn;

use crate::store::{StoredBug, StoredComment};

/// Writes the complete `<bugs>` document.
pub fn write_bugs<W: Write>(writer: &mut W, bugs: &[StoredBug]) -> io::Result<()> {
    writeln!(writer, "<bugs>")?;
    for bug in bugs {
        write_bug(writer, bug)?;
    }
    writeln!(writer, "</bugs>")?;
    writer.flush()
}

/// Renders the complete `<bugs>` document as a string.
pub fn to_xml_string(bugs: &[StoredBug]) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_bugs(&mut buf, bugs);
    String::from_utf8_lossy(&buf).into_owned()
}

fn write_bug<W: Write>(w: &mut W, bug: &StoredBug) -> io::Result<()> {
    let mut el = Element::new(w, 1, &bug.uuid);
    el.open("bug")?;
    el.field("uuid", &bug.uuid)?;
    el.field("short-name", &bug.short_name)?;
    el.field("severity", &bug.severity)?;
    el.field("status", &bug.status)?;
    el.optional("assigned", bug.assigned.as_deref())?;
    el.optional("reporter", bug.reporter.as_deref())?;
    el.optional("creator", bug.creator.as_deref())?;
    el.field("created", &format_be_date(&bug.created))?;
    el.field("summary", &bug.summary)?;
    for extra in &bug.extra_strings {
        el.field("extra-string", extra)?;
    }
    for comment in &bug.comments {
        write_comment(el.writer(), comment)?;
    }
    el.close("bug")
}

fn write_comment<W: Write>(w: &mut W, comment: &StoredComment) -> io::Result<()> {
    let mut el = Element::new(w, 2, &comment.uuid);
    el.open("comment")?;
    el.field("uuid", &comment.uuid)?;
    el.field("short-name", &comment.short_name)?;
    el.optional("in-reply-to", comment.in_reply_to.as_deref())?;
    el.optional("author", comment.author.as_deref())?;
    el.field("date", &format_be_date(&comment.date))?;
    el.field("content-type", &comment.content_type)?;
    el.field("body", &comment.body)?;
    el.close("comment")
}

/// Writes one element and its text children at a fixed depth.
struct Element<'w, W> {
    writer: &'w mut W,
    indent: String,
    /// UUID of the bug or comment being written, for warnings.
    owner: &'w str,
}

impl<'w, W: Write> Element<'w, W> {
    fn new(writer: &'w mut W, depth: usize, owner: &'w str) -> Self {
        Self {
            writer,
            indent: "  ".repeat(depth),
            owner,
        }
    }

    fn writer(&mut self) -> &mut W {
        &mut *self.writer
    }

    fn open(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.writer, "{}<{name}>", self.indent)
    }

    fn close(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.writer, "{}</{name}>", self.indent)
    }

    fn field(&mut self, name: &str, value: &str) -> io::Result<()> {
        if value.chars().any(is_forbidden) {
            warn!(
                uuid = self.owner,
                element = name,
                "replacing characters XML cannot represent with U+FFFD"
            );
        }
        writeln!(self.writer, "{}  <{name}>{}</{name}>", self.indent, escape(value))
    }

    fn optional(&mut self, name: &str, value: Option<&str>) -> io::Result<()> {
        match value {
            Some(value) => self.field(name, value),
            None => Ok(()),
        }
    }
}

/// Escapes the XML special characters in text content.
///
/// `\r` becomes a character reference; characters forbidden by XML 1.0
/// become U+FFFD.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\r' => out.push_str("&#xD;"),
            c if is_forbidden(c) => out.push(char::REPLACEMENT_CHARACTER),
            _ => out.push(c),
        }
    }
    out
}

/// Characters outside the XML 1.0 `Char` production.
fn is_forbidden(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixture;
    use crate::store::BeStore;
    use be2gh_core::date::parse_be_date;
    use be2gh_core::model::{BugDocument, IssueState};
    use pretty_assertions::assert_eq;

    fn sample_bug() -> StoredBug {
        StoredBug {
            uuid: "b-1".into(),
            short_name: "abc/b".into(),
            severity: "minor".into(),
            status: "open".into(),
            assigned: None,
            reporter: Some("Ann <ann@example.com>".into()),
            creator: Some("Ann <ann@example.com>".into()),
            created: parse_be_date("Wed, 01 Apr 2009 22:12:16 +0000").unwrap(),
            summary: "Fails on a & b".into(),
            extra_strings: vec!["BLOCKS:t-1".into()],
            comments: vec![StoredComment {
                uuid: "c-1".into(),
                short_name: "abc/b/c".into(),
                in_reply_to: None,
                author: Some("Ann <ann@example.com>".into()),
                date: parse_be_date("Wed, 01 Apr 2009 22:12:16 +0000").unwrap(),
                content_type: "text/plain".into(),
                body: "Try a < b\n".into(),
            }],
        }
    }

    #[test]
    fn renders_bug_document() {
        insta::assert_snapshot!(to_xml_string(&[sample_bug()]), @r"
        <bugs>
          <bug>
            <uuid>b-1</uuid>
            <short-name>abc/b</short-name>
            <severity>minor</severity>
            <status>open</status>
            <reporter>Ann &lt;ann@example.com&gt;</reporter>
            <creator>Ann &lt;ann@example.com&gt;</creator>
            <created>Wed, 01 Apr 2009 22:12:16 +0000</created>
            <summary>Fails on a &amp; b</summary>
            <extra-string>BLOCKS:t-1</extra-string>
            <comment>
              <uuid>c-1</uuid>
              <short-name>abc/b/c</short-name>
              <author>Ann &lt;ann@example.com&gt;</author>
              <date>Wed, 01 Apr 2009 22:12:16 +0000</date>
              <content-type>text/plain</content-type>
              <body>Try a &lt; b
        </body>
            </comment>
          </bug>
        </bugs>
        ");
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape(r#"<a href="x">&</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn escapes_carriage_returns_and_control_characters() {
        assert_eq!(escape("a\r\nb"), "a&#xD;\nb");
        assert_eq!(escape("x\u{0}y\u{1b}z\u{FFFF}"), "x\u{FFFD}y\u{FFFD}z\u{FFFD}");
        assert_eq!(escape("tab\there\nnext"), "tab\there\nnext");
    }

    #[test]
    fn awkward_comment_text_survives_parsing() {
        let mut bug = sample_bug();
        bug.comments[0].body = "line one\r\nline two".into();
        let mut second = bug.comments[0].clone();
        second.uuid = "c-2".into();
        second.date = parse_be_date("Thu, 02 Apr 2009 08:00:00 +0000").unwrap();
        second.body = "page one\u{c}page two".into();
        bug.comments.push(second);

        let doc = BugDocument::parse(&to_xml_string(&[bug])).unwrap();
        let parsed = &doc.bugs()[0];
        assert_eq!(parsed.body(), "line one\r\nline two");
        assert_eq!(parsed.comments()[0].body_text(), "page one\u{FFFD}page two");
    }

    #[test]
    fn empty_export() {
        assert_eq!(to_xml_string(&[]), "<bugs>\n</bugs>\n");
    }

    #[test]
    fn storage_export_parses_into_model() {
        let tmp = tempfile::tempdir().unwrap();
        let be = fixture::init(tmp.path());
        fixture::bug(
            &be,
            "t0000001",
            r#"{"severity": "target", "status": "open", "summary": "Release 1",
                "time": "Tue, 31 Mar 2009 08:00:00 +0000"}"#,
        );
        let bug = fixture::bug(
            &be,
            "b0000001",
            r#"{"severity": "serious", "status": "fixed", "summary": "Crash [7]",
                "creator": "Ann", "reporter": "Ann",
                "time": "Wed, 01 Apr 2009 22:12:16 +0000",
                "extra_strings": ["BLOCKS:t0000001"]}"#,
        );
        fixture::comment(
            &bug,
            "c0000002",
            r#"{"Author": "Bob", "Date": "Thu, 02 Apr 2009 10:00:00 +0000"}"#,
            Some("Fixed & verified"),
        );
        fixture::comment(
            &bug,
            "c0000001",
            r#"{"Author": "Ann", "Date": "Wed, 01 Apr 2009 22:12:16 +0000"}"#,
            Some("It <crashes>."),
        );

        let bugs = BeStore::open(tmp.path()).unwrap().load_bugs().unwrap();
        let doc = BugDocument::parse(&to_xml_string(&bugs)).unwrap();

        assert_eq!(doc.targets().len(), 1);
        assert_eq!(doc.bugs().len(), 1);
        let bug = &doc.bugs()[0];
        assert_eq!(bug.title(), "Crash [7]");
        assert_eq!(bug.state(), IssueState::Closed);
        assert_eq!(bug.body(), "It <crashes>.");
        assert_eq!(bug.comments().len(), 1);
        assert_eq!(bug.comments()[0].body_text(), "Fixed & verified");
        assert_eq!(bug.milestone().map(|t| t.title()), Some("Release 1"));
    }
}
