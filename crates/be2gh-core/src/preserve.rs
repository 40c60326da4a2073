//! UUIDs whose text must keep its original line breaks.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::text::unwrap_lines;

/// Set of bug or comment UUIDs exempt from newline-unwrapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreserveList {
    uuids: HashSet<String>,
}

impl PreserveList {
    /// Reads one UUID per line. Surrounding whitespace is trimmed and blank
    /// lines are ignored.
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut uuids = HashSet::new();
        for line in reader.lines() {
            let line = line?;
            let uuid = line.trim();
            if !uuid.is_empty() {
                uuids.insert(uuid.to_string());
            }
        }
        Ok(Self { uuids })
    }

    /// Loads a preserve list from a file.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn contains(&self, uuid: &str) -> bool {
        self.uuids.contains(uuid)
    }

    pub fn len(&self) -> usize {
        self.uuids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uuids.is_empty()
    }

    /// Returns `text` as-is if any of `uuids` is listed, unwrapped otherwise.
    pub fn format_text(&self, text: &str, uuids: &[&str]) -> String {
        if uuids.iter().any(|uuid| self.contains(uuid)) {
            text.to_string()
        } else {
            unwrap_lines(text)
        }
    }
}

impl<S: Into<String>> FromIterator<S> for PreserveList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            uuids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_trimmed_non_blank_lines() {
        let data = b"  abc-1  \n\nabc-2\n   \n";
        let list = PreserveList::from_reader(data.as_slice()).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains("abc-1"));
        assert!(list.contains("abc-2"));
        assert!(!list.contains(""));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "uuid-a").unwrap();
        writeln!(file, "uuid-b").unwrap();
        let list = PreserveList::load(file.path()).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PreserveList::load(dir.path().join("nope.txt")).is_err());
    }

    #[test]
    fn format_text_respects_list() {
        let list: PreserveList = ["keep"].into_iter().collect();
        assert_eq!(list.format_text("a\nb", &["keep"]), "a\nb");
        assert_eq!(list.format_text("a\nb", &["other", "keep"]), "a\nb");
        assert_eq!(list.format_text("a\nb", &["other"]), "a b");
        assert!(PreserveList::default().is_empty());
    }
}
