//! Error types for the hed-search crate.
//!
//! Per-source failures never escape the aggregator: they are converted into
//! a [`crate::types::LoadStatus::Error`] entry. Only construction of the
//! aggregator itself returns these errors to the caller.

/// Errors that can occur while configuring the aggregator or loading an index.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The index could not be fetched (network failure or non-success status).
    #[error("fetch error: {0}")]
    Fetch(String),

    /// The fetched body lacks the `Search.setIndex(...)` wrapper or its JSON is invalid.
    #[error("format error: {0}")]
    Format(String),

    /// A term mapping references a document id outside the titles array.
    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for hed-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
