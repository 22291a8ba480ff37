//! Error types for tzfold-core.
//!
//! Only recoverable input conditions are represented here. Passing a
//! datetime tagged with one zone to a different zone is a programming
//! error and panics instead (see the `# Panics` sections on the zone
//! operations), and an indeterminate DST status is an ordinary `None`
//! result rather than an error.

use thiserror::Error;

/// The main error type for tzfold operations.
#[derive(Debug, Error)]
pub enum TzFoldError {
    /// Invalid or unknown timezone name provided.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Error parsing timestamp or datetime input.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Input carried no timezone information where an aware value is required.
    #[error("Naive datetime: {0}")]
    NaiveDatetime(String),

    /// Value outside the representable datetime range.
    #[error("Out of range: {0}")]
    OutOfRange(String),
}

/// Result type alias for tzfold operations.
pub type Result<T> = std::result::Result<T, TzFoldError>;
