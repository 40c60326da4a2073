//! `xml-to-github` -- summarize a Bugs Everywhere XML export, or import it
//! into a GitHub repository.

use clap::Parser;

use be2gh::cli::XmlToGithubCli;
use be2gh::commands::import;
use be2gh::context::{RuntimeContext, init_logging, install_interrupt_handler, report_error};

fn main() {
    install_interrupt_handler();
    let cli = XmlToGithubCli::parse();
    init_logging(cli.verbose);

    let ctx = RuntimeContext::new(cli.verbose, cli.config.clone());
    if let Err(e) = import::run(&ctx, &cli) {
        report_error(&e);
        std::process::exit(1);
    }
}
