//! `github-tool`: delete every issue or milestone of a repository.

use anyhow::{Context, Result};
use be2gh_github::admin::{delete_all_issues, delete_all_milestones};
use tracing::info;

use crate::cli::{AdminCommand, GithubToolCli};
use crate::context::RuntimeContext;

/// Runs the requested deletion and prints how many items went.
pub fn run(ctx: &RuntimeContext, args: &GithubToolCli) -> Result<()> {
    let config = ctx.config()?;
    let mut repo = ctx.connect(&config, &args.owner, &args.repo_name)?;
    let full_name = repo.full_name();

    let (count, what) = match args.command {
        AdminCommand::DeleteIssues => (
            delete_all_issues(&mut repo, config.page_size)
                .with_context(|| format!("failed to delete issues of {full_name}"))?,
            "issues",
        ),
        AdminCommand::DeleteMilestones => (
            delete_all_milestones(&mut repo)
                .with_context(|| format!("failed to delete milestones of {full_name}"))?,
            "milestones",
        ),
    };

    info!(count, repo = %full_name, "deleted {what}");
    println!("Deleted {count} {what} from {full_name}");
    Ok(())
}
