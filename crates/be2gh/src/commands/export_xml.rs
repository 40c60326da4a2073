//! `be-to-xml`: local `.be` storage to XML.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use be2gh_storage::BeStore;
use be2gh_storage::xml::write_bugs;
use tracing::info;

/// Writes every bug found at or above `dir` to `out`. Returns the bug count.
pub fn run<W: Write>(dir: &Path, out: &mut W) -> Result<usize> {
    let store = BeStore::open(dir)?;
    let bugs = store
        .load_bugs()
        .with_context(|| format!("failed to read bugs from {}", store.be_dir().display()))?;
    write_bugs(out, &bugs).context("failed to write XML")?;
    info!(count = bugs.len(), "exported bugs");
    Ok(bugs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn exports_from_a_subdirectory() {
        let tmp = TempDir::new().unwrap();
        let be = tmp.path().join(".be");
        write(&be.join("version"), "Bugs Everywhere Directory v1.4\n");
        write(
            &be.join("bd-1111/bugs/bug-2222/values"),
            r#"{"summary": "Broken", "time": "Wed, 01 Apr 2009 22:12:16 +0000"}"#,
        );
        let nested = tmp.path().join("src/deep");
        fs::create_dir_all(&nested).unwrap();

        let mut out = Vec::new();
        assert_eq!(run(&nested, &mut out).unwrap(), 1);
        let xml = String::from_utf8(out).unwrap();
        assert!(xml.starts_with("<bugs>"));
        assert!(xml.contains("<summary>Broken</summary>"));
    }

    #[test]
    fn missing_storage_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = run(tmp.path(), &mut Vec::new()).unwrap_err();
        assert!(format!("{err:#}").contains(".be"), "unexpected error: {err:#}");
    }
}
