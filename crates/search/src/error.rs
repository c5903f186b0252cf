//! Error types for the search crate.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Query string that cannot be matched against anything
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}
