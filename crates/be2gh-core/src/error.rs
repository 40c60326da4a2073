//! Errors raised while reading an exported XML document.

/// Errors that can occur while converting the XML export into the model.
///
/// There is no partial-success mode: the first error aborts the whole
/// document.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The input is not well-formed XML.
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The document has no `<bugs>` element.
    #[error("no <bugs> element found in document")]
    MissingRoot,

    /// A required child element is absent.
    #[error("<{element}>{} is missing required field <{field}>", owner_suffix(.uuid))]
    MissingField {
        /// The element that was being read (`bug` or `comment`).
        element: &'static str,
        /// The missing child element.
        field: &'static str,
        /// UUID of the enclosing bug, when it could be read.
        uuid: Option<String>,
    },

    /// A date field did not match the Bugs Everywhere date format.
    #[error("invalid date {value:?} in <{field}>{}: {source}", owner_suffix(.uuid))]
    InvalidDate {
        /// The date element (`created` or `date`).
        field: &'static str,
        /// The raw text that failed to parse.
        value: String,
        /// UUID of the enclosing bug, when it could be read.
        uuid: Option<String>,
        /// Underlying chrono error.
        source: chrono::ParseError,
    },
}

/// Result alias for XML conversion.
pub type Result<T> = std::result::Result<T, ParseError>;

fn owner_suffix(uuid: &Option<String>) -> String {
    match uuid {
        Some(uuid) => format!(" (bug {uuid})"),
        None => String::new(),
    }
}

impl ParseError {
    /// Returns `true` if this error reports a missing required field.
    pub fn is_missing_field(&self) -> bool {
        matches!(self, Self::MissingField { .. })
    }
}
