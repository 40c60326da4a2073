//! Configuration management for be2gh.
//!
//! Settings are layered with figment: built-in defaults, then an optional
//! `be2gh.yaml` file, then `BE2GH_*` environment variables. The GitHub token
//! is kept separate from the layered settings and read once with
//! [`token::resolve_token`].

pub mod config;
pub mod token;

pub use config::{ConfigError, MigrationConfig, Result, load_config};
pub use token::{Token, resolve_token};
