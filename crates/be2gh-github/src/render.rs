//! Text of the issues and comments created on GitHub.

use be2gh_core::date::format_iso_datetime;
use be2gh_core::text::{LegacyTitle, split_legacy_index};
use be2gh_core::{Bug, Comment, PreserveList};

/// Issue title with any legacy index split off.
pub fn issue_title(bug: &Bug) -> LegacyTitle<'_> {
    split_legacy_index(bug.title())
}

/// Issue description: the bug body, unwrapped unless preserve-listed.
pub fn issue_body(bug: &Bug, preserve: &PreserveList) -> String {
    preserve.format_text(bug.body(), &[bug.uuid()])
}

/// First comment on every issue, recording the original BE metadata.
pub fn metadata_comment(bug: &Bug, legacy_index: Option<&str>) -> String {
    let ditz = legacy_index
        .map(|index| format!("Ditz bug index: {index}\n"))
        .unwrap_or_default();
    format!(
        "```\n\
         Bugs Everywhere data:\n\
         Created at: {}\n\
         Status: {}\n\
         Severity: {}\n\
         UUID: {}\n\
         Short name: {}\n\
         {ditz}```",
        format_iso_datetime(&bug.created_at()),
        bug.status(),
        bug.severity(),
        bug.uuid(),
        bug.short_name(),
    )
}

/// A migrated comment: timestamp, text, and the comment UUID.
///
/// The text keeps its line breaks if either the comment or its bug is
/// preserve-listed.
pub fn comment_body(bug: &Bug, comment: &Comment, preserve: &PreserveList) -> String {
    format!(
        "{}\n\n{}\n\nUUID: {}",
        format_iso_datetime(&comment.created_at()),
        preserve.format_text(comment.body_text(), &[comment.uuid(), bug.uuid()]),
        comment.uuid()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use be2gh_core::BugDocument;
    use pretty_assertions::assert_eq;

    const DOC: &str = r#"<bugs>
  <bug>
    <uuid>b-1</uuid>
    <short-name>abc/b1</short-name>
    <severity>serious</severity>
    <status>wontfix</status>
    <reporter>Ann</reporter>
    <creator>Ann</creator>
    <created>Wed, 01 Apr 2009 22:12:16 +0000</created>
    <summary>Crash on startup [42]</summary>
    <comment>
      <uuid>c-1</uuid>
      <date>Wed, 01 Apr 2009 22:12:16 +0000</date>
      <body>The program
crashes.

Every time.
</body>
    </comment>
    <comment>
      <uuid>c-2</uuid>
      <date>Thu, 02 Apr 2009 08:00:00 +0000</date>
      <body>Not
reproducible.</body>
    </comment>
  </bug>
</bugs>"#;

    fn bug() -> Bug {
        BugDocument::parse(DOC).unwrap().bugs()[0].clone()
    }

    #[test]
    fn title_drops_legacy_index() {
        let bug = bug();
        let title = issue_title(&bug);
        assert_eq!(title.title, "Crash on startup");
        assert_eq!(title.legacy_index, Some("42"));
    }

    #[test]
    fn body_is_unwrapped() {
        assert_eq!(
            issue_body(&bug(), &PreserveList::default()),
            "The program crashes.\n\nEvery time.\n"
        );
    }

    #[test]
    fn preserved_body_is_verbatim() {
        let preserve: PreserveList = ["b-1"].into_iter().collect();
        assert_eq!(
            issue_body(&bug(), &preserve),
            "The program\ncrashes.\n\nEvery time.\n"
        );
    }

    #[test]
    fn metadata_with_legacy_index() {
        insta::assert_snapshot!(metadata_comment(&bug(), Some("42")), @r"
        ```
        Bugs Everywhere data:
        Created at: 2009-04-01 22:12:16
        Status: wontfix
        Severity: serious
        UUID: b-1
        Short name: abc/b1
        Ditz bug index: 42
        ```
        ");
    }

    #[test]
    fn metadata_without_legacy_index() {
        let text = metadata_comment(&bug(), None);
        assert!(!text.contains("Ditz"));
        assert!(text.ends_with("Short name: abc/b1\n```"));
    }

    #[test]
    fn comment_has_date_and_uuid() {
        let bug = bug();
        let comment = &bug.comments()[0];
        assert_eq!(
            comment_body(&bug, comment, &PreserveList::default()),
            "2009-04-02 08:00:00\n\nNot reproducible.\n\nUUID: c-2"
        );
    }

    #[test]
    fn comment_preserved_by_comment_or_bug_uuid() {
        let bug = bug();
        let comment = &bug.comments()[0];
        for uuid in ["c-2", "b-1"] {
            let preserve: PreserveList = [uuid].into_iter().collect();
            assert!(comment_body(&bug, comment, &preserve).contains("Not\nreproducible."));
        }
    }
}
