//! Traits at the seam between the migration logic and GitHub.
//!
//! The exporter and the admin operations depend on these traits rather than
//! on [`GithubRepo`](crate::client::GithubRepo) so that tests can substitute
//! an in-memory recorder.

use be2gh_core::IssueState;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Repository-scoped milestone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MilestoneNumber(pub u64);

/// Repository-scoped issue number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueNumber(pub u64);

/// Fields of an issue to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewIssue<'a> {
    pub title: &'a str,
    pub body: &'a str,
    #[serde(skip_serializing_if = "no_labels")]
    pub labels: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<MilestoneNumber>,
}

fn no_labels(labels: &&[String]) -> bool {
    labels.is_empty()
}

/// A milestone as listed by GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MilestoneSummary {
    pub number: MilestoneNumber,
    pub title: String,
    pub state: IssueState,
}

/// Write access needed to import issues.
pub trait IssueTracker {
    /// Creates a milestone in the given state.
    fn create_milestone(&mut self, title: &str, state: IssueState) -> Result<MilestoneNumber>;

    /// Creates an issue. New issues are always open.
    fn create_issue(&mut self, issue: &NewIssue<'_>) -> Result<IssueNumber>;

    /// Opens or closes an existing issue.
    fn set_issue_state(&mut self, issue: IssueNumber, state: IssueState) -> Result<()>;

    /// Adds a comment to an existing issue.
    fn create_comment(&mut self, issue: IssueNumber, body: &str) -> Result<()>;
}

/// Destructive access needed to reset a repository.
pub trait RepositoryAdmin {
    /// Every milestone, open or closed.
    fn list_milestones(&mut self) -> Result<Vec<MilestoneSummary>>;

    fn delete_milestone(&mut self, milestone: MilestoneNumber) -> Result<()>;

    /// GraphQL node IDs of up to `first` issues, open or closed.
    fn issue_node_ids(&mut self, first: u32) -> Result<Vec<String>>;

    /// Deletes an issue by GraphQL node ID.
    fn delete_issue(&mut self, node_id: &str) -> Result<()>;
}
