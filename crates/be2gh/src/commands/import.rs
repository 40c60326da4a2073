//! `xml-to-github`: summarize an XML export and optionally push it to GitHub.

use std::fs::{self, File};
use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use be2gh_core::summary::write_report;
use be2gh_core::{BugDocument, PreserveList};
use be2gh_github::{ExportOptions, Exporter};
use tracing::info;

use crate::cli::XmlToGithubCli;
use crate::context::RuntimeContext;

/// Runs the importer. Remote export happens only with `--owner`/`--repo`.
pub fn run(ctx: &RuntimeContext, args: &XmlToGithubCli) -> Result<()> {
    let doc = read_document(args)?;
    info!(bugs = doc.bugs().len(), targets = doc.targets().len(), "export parsed");

    if args.dump {
        let stdout = io::stdout();
        write_report(&mut stdout.lock(), doc.bugs()).context("failed to print summary")?;
    }
    if let Some(path) = &args.dump_to {
        let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        write_report(&mut BufWriter::new(file), doc.bugs())
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
    }

    let preserve = match &args.preserve_newlines {
        Some(path) => PreserveList::load(path)
            .with_context(|| format!("failed to read preserve list {}", path.display()))?,
        None => PreserveList::default(),
    };

    let Some((owner, name)) = args.remote() else {
        return Ok(());
    };

    let config = ctx.config()?;
    let mut repo = ctx.connect(&config, owner, name)?;
    let options = ExportOptions {
        limit: args.limit.or(config.limit),
        verbose: ctx.verbose,
    };
    let report = Exporter::new(&mut repo, &preserve, options, io::stdout().lock())
        .export(&doc)
        .with_context(|| format!("export to {owner}/{name} failed"))?;
    info!(
        milestones = report.milestones,
        issues = report.issues,
        comments = report.comments,
        "migrated to {owner}/{name}"
    );
    Ok(())
}

fn read_document(args: &XmlToGithubCli) -> Result<BugDocument> {
    let path = &args.xml_file;
    let xml = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    BugDocument::parse(&xml).with_context(|| format!("failed to parse {}", path.display()))
}

