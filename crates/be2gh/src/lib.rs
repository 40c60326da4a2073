//! Shared plumbing for the `be-to-xml`, `xml-to-github` and `github-tool`
//! binaries: argument definitions, runtime setup and command handlers.

pub mod cli;
pub mod commands;
pub mod context;
