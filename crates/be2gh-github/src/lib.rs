//! GitHub side of the migration.
//!
//! [`exporter`] turns a converted [`BugDocument`](be2gh_core::BugDocument)
//! into milestones, issues and comments through the [`IssueTracker`] trait;
//! [`admin`] wipes a repository through [`RepositoryAdmin`]. [`client`]
//! implements both traits against the real GitHub APIs.

pub mod admin;
pub mod client;
pub mod error;
pub mod exporter;
pub mod render;
pub mod tracker;

pub use client::{GithubClient, GithubRepo};
pub use error::{GithubError, Result};
pub use exporter::{ExportOptions, ExportReport, Exporter};
pub use tracker::{IssueNumber, IssueTracker, MilestoneNumber, MilestoneSummary, NewIssue, RepositoryAdmin};
