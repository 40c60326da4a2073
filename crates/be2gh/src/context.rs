//! Runtime setup shared by the binaries.
//!
//! [`RuntimeContext`] holds what a command handler needs beyond its own
//! arguments: verbosity and where configuration comes from. It also knows
//! how to turn that into a connected [`GithubRepo`].

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use be2gh_config::{MigrationConfig, load_config, resolve_token};
use be2gh_github::{GithubClient, GithubRepo};
use tracing_subscriber::EnvFilter;

/// Crates whose logs `--verbose` raises to `debug`.
const WORKSPACE_CRATES: &[&str] = &[
    "be2gh",
    "be2gh_core",
    "be2gh_storage",
    "be2gh_config",
    "be2gh_github",
    "be_to_xml",
    "xml_to_github",
    "github_tool",
];

/// Exit status after an interrupt, as a shell reports SIGINT.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Tracks whether a Ctrl+C has already been received.
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Runtime context passed to every command handler.
#[derive(Debug, Clone, Default)]
pub struct RuntimeContext {
    /// Verbose output.
    pub verbose: bool,

    /// Explicit `--config` file, if any.
    pub config_path: Option<PathBuf>,
}

impl RuntimeContext {
    pub fn new(verbose: bool, config_path: Option<PathBuf>) -> Self {
        Self { verbose, config_path }
    }

    /// Loads the layered configuration.
    pub fn config(&self) -> Result<MigrationConfig> {
        load_config(self.config_path.as_deref()).context("failed to load configuration")
    }

    /// Reads the token and builds a client for `owner/name`.
    pub fn connect(&self, config: &MigrationConfig, owner: &str, name: &str) -> Result<GithubRepo> {
        let token = resolve_token(config)?;
        let client = GithubClient::new(config, token);
        let repo = GithubRepo::new(client, owner, name, config.page_size);
        tracing::debug!(repo = %repo.full_name(), "connected");
        Ok(repo)
    }
}

/// Installs the stderr log subscriber.
///
/// `--verbose` enables `debug` for the workspace crates; otherwise `RUST_LOG`
/// is honoured and defaults to `warn`.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        let directives: Vec<String> = WORKSPACE_CRATES.iter().map(|name| format!("{name}=debug")).collect();
        EnvFilter::new(format!("warn,{}", directives.join(",")))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Installs the Ctrl+C handler.
///
/// First Ctrl+C: report that the remote side may be half-migrated and exit.
/// Second: force exit without a message.
pub fn install_interrupt_handler() {
    let _ = ctrlc::set_handler(|| {
        if CTRLC_RECEIVED.swap(true, Ordering::SeqCst) {
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
        eprintln!("Interrupted; anything already created on GitHub is left in place");
        std::process::exit(INTERRUPTED_EXIT_CODE);
    });
}

/// Prints `err` with its cause chain the way every binary reports failures.
pub fn report_error(err: &anyhow::Error) {
    eprintln!("Error: {err:#}");
}

