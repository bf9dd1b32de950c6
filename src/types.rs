//! Service-wide error types
//!
//! Transient content-store retrieval failures are NOT represented here:
//! the fetcher degrades them to empty content by contract (see
//! [`crate::store::FetchedContent`]). A detected duplicate is a business
//! verdict, not an error, and is carried by
//! [`crate::similarity::SimilarityVerdict`].

use thiserror::Error;

/// Errors surfaced by hallmark subsystems
#[derive(Debug, Error)]
pub enum HallmarkError {
    /// Invalid or inconsistent configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Registry (MongoDB) connection or query failure
    #[error("Database error: {0}")]
    Database(String),

    /// Content-addressed store ingest failure
    #[error("Content store error: {0}")]
    Storage(String),

    /// Malformed or incomplete submission
    #[error("Validation error: {0}")]
    Validation(String),

    /// Underlying I/O failure (listener bind, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP protocol failure
    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),
}

/// Convenience result alias
pub type Result<T> = std::result::Result<T, HallmarkError>;
