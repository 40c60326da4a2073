//! Creates milestones, issues and comments for a converted export.
//!
//! The run is strictly sequential and stops at the first failure. Nothing
//! records what was already created, so rerunning duplicates issues.

use std::collections::HashMap;
use std::io::Write;

use be2gh_core::text::{one_line_preview, truncate_chars};
use be2gh_core::{Bug, BugDocument, IssueState, PreserveList};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::render;
use crate::tracker::{IssueTracker, MilestoneNumber, NewIssue};

/// Characters of a title or comment echoed in verbose mode.
pub const VERBOSE_PREVIEW_CHARS: usize = 60;

/// What to export and how chatty to be.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Export only the first `limit` bugs (oldest first); `None` means all.
    pub limit: Option<usize>,
    /// Echo each issue title and comment as it is created.
    pub verbose: bool,
}

/// Counts of what a run created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub milestones: usize,
    pub issues: usize,
    pub comments: usize,
    /// Targets folded into a milestone of the same title.
    pub merged_targets: usize,
}

/// One milestone to create, possibly standing for several targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestonePlan {
    pub title: String,
    pub state: IssueState,
    /// Number of targets sharing this title.
    pub targets: usize,
}

/// Groups targets by title, in target creation order.
///
/// A merged milestone is open if any of its targets is open.
pub fn plan_milestones(doc: &BugDocument) -> Vec<MilestonePlan> {
    let mut plans: Vec<MilestonePlan> = Vec::new();
    for target in doc.targets_by_creation() {
        match plans.iter_mut().find(|p| p.title == target.title()) {
            Some(plan) => {
                plan.targets += 1;
                if target.state() == IssueState::Open {
                    plan.state = IssueState::Open;
                }
            }
            None => plans.push(MilestonePlan {
                title: target.title().to_string(),
                state: target.state(),
                targets: 1,
            }),
        }
    }
    plans
}

/// Drives an [`IssueTracker`] through one migration.
pub struct Exporter<'a, T, W> {
    tracker: &'a mut T,
    preserve: &'a PreserveList,
    options: ExportOptions,
    out: W,
}

impl<'a, T: IssueTracker, W: Write> Exporter<'a, T, W> {
    /// `out` receives the verbose echo; it is unused otherwise.
    pub fn new(tracker: &'a mut T, preserve: &'a PreserveList, options: ExportOptions, out: W) -> Self {
        Self {
            tracker,
            preserve,
            options,
            out,
        }
    }

    /// Creates every milestone, then the issues in scope.
    pub fn export(&mut self, doc: &BugDocument) -> Result<ExportReport> {
        let mut report = ExportReport::default();
        let milestones = self.create_milestones(doc, &mut report)?;

        let bugs = doc.bugs();
        let scope = self.options.limit.map_or(bugs.len(), |n| n.min(bugs.len()));
        if scope < bugs.len() {
            info!(exporting = scope, total = bugs.len(), "export limited");
        }

        for bug in &bugs[..scope] {
            report.comments += self.export_bug(bug, &milestones)?;
            report.issues += 1;
        }

        info!(
            milestones = report.milestones,
            issues = report.issues,
            comments = report.comments,
            "export finished"
        );
        Ok(report)
    }

    fn create_milestones(
        &mut self,
        doc: &BugDocument,
        report: &mut ExportReport,
    ) -> Result<HashMap<String, MilestoneNumber>> {
        let mut numbers = HashMap::new();
        for plan in plan_milestones(doc) {
            if plan.targets > 1 {
                warn!(
                    title = %plan.title,
                    targets = plan.targets,
                    "targets share a title and are merged into one milestone"
                );
                report.merged_targets += plan.targets - 1;
            }
            let number = self.tracker.create_milestone(&plan.title, plan.state)?;
            numbers.insert(plan.title, number);
            report.milestones += 1;
        }
        Ok(numbers)
    }

    /// Creates the issue for `bug` and returns the number of comments added,
    /// including the metadata comment.
    fn export_bug(&mut self, bug: &Bug, milestones: &HashMap<String, MilestoneNumber>) -> Result<usize> {
        let title = render::issue_title(bug);
        if self.options.verbose {
            writeln!(self.out, "Issue: {}", truncate_chars(title.title, VERBOSE_PREVIEW_CHARS))?;
        }

        let body = render::issue_body(bug, self.preserve);
        let issue = NewIssue {
            title: title.title,
            body: &body,
            labels: bug.labels(),
            milestone: bug
                .milestone()
                .and_then(|target| milestones.get(target.title()).copied()),
        };
        let number = self.tracker.create_issue(&issue)?;
        self.tracker.set_issue_state(number, bug.state())?;
        debug!(uuid = bug.uuid(), number = number.0, state = %bug.state(), "issue created");

        self.tracker
            .create_comment(number, &render::metadata_comment(bug, title.legacy_index))?;

        for comment in bug.comments() {
            if self.options.verbose {
                writeln!(
                    self.out,
                    "  Comment: {}",
                    one_line_preview(comment.body_text(), VERBOSE_PREVIEW_CHARS)
                )?;
            }
            self.tracker
                .create_comment(number, &render::comment_body(bug, comment, self.preserve))?;
        }
        Ok(bug.comments().len() + 1)
    }
}
