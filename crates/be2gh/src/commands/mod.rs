//! Command handlers, one module per binary.

pub mod admin;
pub mod export_xml;
pub mod import;
