//! Core types for converting a Bugs Everywhere XML export into GitHub issues.
//!
//! The XML document is read into typed records ([`xml`]), resolved into an
//! immutable model of targets, bugs and comments ([`model`]), and can be
//! rendered as a plain-text summary ([`summary`]).

pub mod date;
pub mod error;
pub mod model;
pub mod preserve;
pub mod summary;
pub mod text;
pub mod xml;

pub use error::{ParseError, Result};
pub use model::{Bug, BugDocument, Comment, IssueState, Target, TargetMap};
pub use preserve::PreserveList;
