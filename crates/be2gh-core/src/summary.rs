//! Plain-text summary of a converted export.
//!
//! One line per bug (`<date> <milestone> <state> <title>`), followed by an
//! indented preview line for each of its comments, and a final count.

use std::io::{self, Write};

use crate::date::format_iso_date;
use crate::model::Bug;
use crate::text::one_line_preview;

/// Shown in place of a milestone title for bugs without one.
pub const NO_MILESTONE: &str = "None";

/// Number of comment characters shown per preview line.
pub const PREVIEW_CHARS: usize = 60;

/// Formats one bug and its comment previews.
pub fn bug_summary(bug: &Bug) -> String {
    let mut out = format!(
        "{} {} {} {}",
        format_iso_date(&bug.created_at()),
        bug.milestone().map_or(NO_MILESTONE, |t| t.title()),
        bug.state().initial(),
        bug.title()
    );
    for comment in bug.comments() {
        out.push_str("\n  ");
        out.push_str(&format_iso_date(&comment.created_at()));
        out.push(' ');
        out.push_str(&one_line_preview(comment.body_text(), PREVIEW_CHARS));
    }
    out
}

/// Writes the summary of every bug followed by `<N> bugs read`.
pub fn write_report<W: Write>(writer: &mut W, bugs: &[Bug]) -> io::Result<()> {
    for bug in bugs {
        writeln!(writer, "{}", bug_summary(bug))?;
    }
    writeln!(writer, "{} bugs read", bugs.len())?;
    writer.flush()
}
