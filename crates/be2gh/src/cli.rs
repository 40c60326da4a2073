//! Clap CLI definitions for the three binaries.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// be-to-xml -- dump the Bugs Everywhere tracker of the current directory as XML.
#[derive(Parser, Debug)]
#[command(
    name = "be-to-xml",
    about = "Export the Bugs Everywhere tracker of the current directory as XML",
    long_about = "Finds the .be directory at or above the current directory and writes every bug and comment to standard output as a single XML document.",
    version
)]
pub struct BeToXmlCli {}

/// xml-to-github -- summarize an XML export or import it into GitHub.
#[derive(Parser, Debug)]
#[command(
    name = "xml-to-github",
    about = "Summarize a Bugs Everywhere XML export or import it into GitHub issues",
    version
)]
pub struct XmlToGithubCli {
    /// Exported BE XML file.
    #[arg(value_name = "XML_FILE")]
    pub xml_file: PathBuf,

    /// Print a summary of the parsed bugs.
    #[arg(long)]
    pub dump: bool,

    /// Write the summary to FILE.
    #[arg(long, value_name = "FILE")]
    pub dump_to: Option<PathBuf>,

    /// GitHub repository owner; requires --repo.
    #[arg(long, requires = "repo")]
    pub owner: Option<String>,

    /// GitHub repository name; requires --owner.
    #[arg(long, requires = "owner")]
    pub repo: Option<String>,

    /// Echo issues and comments as they are created, and log debug output.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// File of bug or comment UUIDs (one per line) whose text keeps its line breaks.
    #[arg(long, value_name = "FILE")]
    pub preserve_newlines: Option<PathBuf>,

    /// Export only the first N bugs, oldest first (default: all).
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Configuration file (default: ./be2gh.yaml if present).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl XmlToGithubCli {
    /// The target repository, when both halves were given.
    pub fn remote(&self) -> Option<(&str, &str)> {
        self.owner.as_deref().zip(self.repo.as_deref())
    }
}

/// github-tool -- reset a GitHub repository between migration attempts.
#[derive(Parser, Debug)]
#[command(
    name = "github-tool",
    about = "Delete every issue or every milestone of a GitHub repository",
    version
)]
pub struct GithubToolCli {
    /// What to delete.
    #[arg(value_enum)]
    pub command: AdminCommand,

    /// Repository owner.
    #[arg(value_name = "OWNER")]
    pub owner: String,

    /// Repository name.
    #[arg(value_name = "REPO_NAME")]
    pub repo_name: String,

    /// Configuration file (default: ./be2gh.yaml if present).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Destructive repository operations.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    /// Delete every issue, open or closed.
    DeleteIssues,
    /// Delete every milestone, open or closed.
    DeleteMilestones,
}
