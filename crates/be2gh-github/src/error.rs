//! GitHub error types.

/// Errors that can occur while talking to GitHub.
///
/// Every variant is fatal for the migration: nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    /// GitHub answered with a non-success status.
    #[error("{method} {url} failed with status {status}: {message}")]
    Http {
        /// HTTP method of the failed request.
        method: &'static str,
        /// Request URL.
        url: String,
        /// Response status code.
        status: u16,
        /// Response body (GitHub's error message), possibly empty.
        message: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("{method} {url} failed: {source}")]
    Transport {
        /// HTTP method of the failed request.
        method: &'static str,
        /// Request URL.
        url: String,
        /// Underlying ureq error.
        source: Box<ureq::Error>,
    },

    /// A GraphQL response carried an `errors` array.
    #[error("GraphQL query failed: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// A response parsed but lacked the data we asked for.
    #[error("unexpected response from {url}: {reason}")]
    UnexpectedResponse {
        /// Request URL.
        url: String,
        /// What was missing or wrong.
        reason: String,
    },

    /// Issue listing kept returning issues that were already deleted, so the
    /// repository may still hold issues.
    #[error("deletion incomplete: issue listing still returns deleted issues after {deleted} deletions")]
    DeletionStalled {
        /// Issues deleted before the listing stalled.
        deleted: usize,
    },

    /// Progress output could not be written.
    #[error("failed to write progress output: {0}")]
    Output(#[from] std::io::Error),
}

/// Result alias for GitHub operations.
pub type Result<T> = std::result::Result<T, GithubError>;

impl GithubError {
    /// The HTTP status, if GitHub answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
