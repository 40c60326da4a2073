//! `be-to-xml` -- write the Bugs Everywhere tracker of the current directory
//! to standard output as XML.

use std::io::{self, BufWriter};

use anyhow::Context;
use clap::Parser;

use be2gh::cli::BeToXmlCli;
use be2gh::commands::export_xml;
use be2gh::context::{init_logging, install_interrupt_handler, report_error};

fn main() {
    install_interrupt_handler();
    let BeToXmlCli {} = BeToXmlCli::parse();
    init_logging(false);

    let result = std::env::current_dir()
        .context("failed to determine the current directory")
        .and_then(|dir| export_xml::run(&dir, &mut BufWriter::new(io::stdout().lock())));

    if let Err(e) = result {
        report_error(&e);
        std::process::exit(1);
    }
}
