//! The GitHub token, read once from the environment.

use std::fmt;

use crate::config::{ConfigError, MigrationConfig, Result};

/// A GitHub bearer token. Its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw token, for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Reads the token from the variable named by `config.token_var`.
///
/// # Errors
///
/// Returns [`ConfigError::MissingToken`] if the variable is unset, empty or
/// not valid Unicode.
pub fn resolve_token(config: &MigrationConfig) -> Result<Token> {
    token_from(&config.token_var, std::env::var(&config.token_var).ok())
}

fn token_from(var: &str, value: Option<String>) -> Result<Token> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(Token(v)),
        _ => Err(ConfigError::MissingToken {
            var: var.to_string(),
        }),
    }
}
