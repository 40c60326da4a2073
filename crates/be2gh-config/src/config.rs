//! Layered configuration for the importer and the admin tool.
//!
//! The main entry point is [`load_config`], which merges (lowest to highest
//! precedence):
//!
//! 1. [`MigrationConfig::default`]
//! 2. a YAML file (`be2gh.yaml` in the working directory, or an explicit path)
//! 3. environment variables prefixed with `BE2GH_` (e.g. `BE2GH_LIMIT=2`)

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "be2gh.yaml";

/// Prefix of environment variables that override config keys.
pub const ENV_PREFIX: &str = "BE2GH_";

/// Environment variable holding the GitHub token unless configured otherwise.
pub const DEFAULT_TOKEN_VAR: &str = "BE_TO_GITHUB_TOKEN";

/// Largest page size the GitHub APIs accept.
pub const MAX_PAGE_SIZE: u32 = 100;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A source could not be parsed or had the wrong shape.
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue {
        /// The configuration key that had an invalid value.
        key: String,
        /// A description of why the value is invalid.
        reason: String,
    },

    /// The token environment variable is unset or empty.
    #[error("environment variable {var} is not set (a GitHub token is required)")]
    MissingToken {
        /// Name of the variable that was read.
        var: String,
    },
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// MigrationConfig
// ---------------------------------------------------------------------------

/// Settings shared by the importer and the admin tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Base URL of the GitHub REST API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// URL of the GitHub GraphQL endpoint.
    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,

    /// `User-Agent` sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Name of the environment variable holding the token.
    #[serde(default = "default_token_var")]
    pub token_var: String,

    /// Items per page when listing issues or milestones.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Export only the first `limit` bugs (oldest first). `None` exports all.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            graphql_url: default_graphql_url(),
            user_agent: default_user_agent(),
            token_var: default_token_var(),
            page_size: default_page_size(),
            limit: None,
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_graphql_url() -> String {
    "https://api.github.com/graphql".to_string()
}

fn default_user_agent() -> String {
    concat!("be2gh/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_token_var() -> String {
    DEFAULT_TOKEN_VAR.to_string()
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

impl MigrationConfig {
    /// Checks values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidValue {
                key: "page_size".into(),
                reason: format!("must be between 1 and {MAX_PAGE_SIZE}"),
            });
        }
        if self.token_var.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "token_var".into(),
                reason: "must not be empty".into(),
            });
        }
        for (key, url) in [("api_url", &self.api_url), ("graphql_url", &self.graphql_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    reason: format!("{url:?} is not an http(s) URL"),
                });
            }
        }
        Ok(())
    }

    /// REST API base URL without a trailing slash.
    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Builds the layered figment for `explicit` (or the default file).
///
/// # Errors
///
/// Returns [`ConfigError::FileNotFound`] if `explicit` names a missing file.
/// A missing default file is not an error.
pub fn figment(explicit: Option<&Path>) -> Result<Figment> {
    let file = match explicit {
        Some(path) if !path.is_file() => return Err(ConfigError::FileNotFound(path.to_path_buf())),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(DEFAULT_CONFIG_FILE),
    };
    debug!(file = %file.display(), "building configuration");

    Ok(Figment::from(Serialized::defaults(MigrationConfig::default()))
        .merge(Yaml::file(file))
        .merge(Env::prefixed(ENV_PREFIX)))
}

/// Loads and validates the configuration.
pub fn load_config(explicit: Option<&Path>) -> Result<MigrationConfig> {
    let config: MigrationConfig = figment(explicit)?.extract().map_err(Box::new)?;
    config.validate()?;
    debug!(?config, "configuration loaded");
    Ok(config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
