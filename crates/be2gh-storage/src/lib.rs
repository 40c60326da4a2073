//! Bugs Everywhere storage access for be2gh.
//!
//! Reads the `.be/` directory of a working tree ([`store`]) and writes the
//! loaded bugs as the XML export consumed by the importer ([`xml`]).

pub mod be_dir;
pub mod error;
pub mod short_name;
pub mod store;
pub mod values;
pub mod xml;

pub use error::{Result, StorageError};
pub use store::{BeStore, StoredBug, StoredComment};
