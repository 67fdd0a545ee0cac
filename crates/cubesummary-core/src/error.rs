//! Error types for cubesummary-core.
//!
//! This module defines the error types used throughout the library,
//! with specific error categories for timezone configuration, period
//! specifications, queries, parsing and the summary store.

use thiserror::Error;

/// The main error type for cubesummary operations.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Invalid timezone name provided.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Inconsistent or out-of-range period specification.
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Search query that can never match (e.g. an empty time range).
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Error parsing a timestamp or dataset document.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Summary store misuse, such as loading summaries generated in another timezone.
    #[error("Store error: {0}")]
    StoreError(String),

    /// Invalid configuration file.
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Summary file could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for cubesummary operations.
pub type Result<T> = std::result::Result<T, SummaryError>;
