//! `github-tool` -- delete every issue or every milestone of a GitHub
//! repository, to reset it between migration attempts.

use clap::Parser;

use be2gh::cli::GithubToolCli;
use be2gh::commands::admin;
use be2gh::context::{RuntimeContext, init_logging, install_interrupt_handler, report_error};

fn main() {
    install_interrupt_handler();
    let cli = GithubToolCli::parse();
    init_logging(cli.verbose);

    let ctx = RuntimeContext::new(cli.verbose, cli.config.clone());
    if let Err(e) = admin::run(&ctx, &cli) {
        report_error(&e);
        std::process::exit(1);
    }
}
