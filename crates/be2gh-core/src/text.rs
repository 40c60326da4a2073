//! String reformatting applied when issues are written to GitHub.

use std::sync::LazyLock;

use regex::Regex;

/// Matches a title ending in a bracketed number, e.g. `Fix crash [42]`.
static LEGACY_INDEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*) \[(\d+)\]$").expect("legacy index pattern is valid")
});

/// A title with its legacy (Ditz) index split off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyTitle<'a> {
    /// The title without the bracketed suffix.
    pub title: &'a str,
    /// The digits inside the brackets, if the title had a suffix.
    pub legacy_index: Option<&'a str>,
}

/// Splits a trailing ` [<digits>]` off `title`.
///
/// Titles without the suffix are returned unchanged with no index.
pub fn split_legacy_index(title: &str) -> LegacyTitle<'_> {
    match LEGACY_INDEX.captures(title) {
        Some(caps) => LegacyTitle {
            title: caps.get(1).map_or(title, |m| m.as_str()),
            legacy_index: caps.get(2).map(|m| m.as_str()),
        },
        None => LegacyTitle {
            title,
            legacy_index: None,
        },
    }
}

/// Joins hard-wrapped lines back into paragraphs.
///
/// A newline with a non-newline character on both sides becomes a space.
/// Blank-line paragraph breaks, a leading newline and a trailing newline are
/// left alone.
pub fn unwrap_lines(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        let joins_lines = c == '\n'
            && i > 0
            && chars[i - 1] != '\n'
            && chars.get(i + 1).is_some_and(|&next| next != '\n');
        out.push(if joins_lines { ' ' } else { c });
    }
    out
}

/// Returns at most the first `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Collapses newlines to spaces and truncates to `max` characters.
///
/// Used for one-line previews of comment text.
pub fn one_line_preview(text: &str, max: usize) -> String {
    truncate_chars(text, max).replace('\n', " ")
}
