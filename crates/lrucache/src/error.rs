//! Error types for lrucache

use std::fmt;

/// Result type alias for lrucache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache construction
///
/// A missing key is not an error: lookups return `Option`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Capacity is zero, negative, or does not fit in `usize`
    InvalidCapacity(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCapacity(value) => write!(
                f,
                "Invalid capacity: {} (must be a positive integer)",
                value
            ),
        }
    }
}

impl std::error::Error for Error {}
