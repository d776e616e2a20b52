//! Error types for FMX operations.
//!
//! Errors are raised at construction or query entry only. Absent patterns,
//! over-long patterns and empty patterns are normal outcomes with defined
//! results, never errors.

use thiserror::Error;

/// Main error type for FMX operations
#[derive(Error, Debug)]
pub enum FmxError {
    /// The input text contains the reserved sentinel byte and cannot be indexed
    #[error("input contains reserved sentinel byte 0x00 at offset {offset}")]
    SentinelInInput { offset: usize },

    /// The pattern contains the reserved sentinel byte, which can never occur
    /// at a stored position
    #[error("pattern contains reserved sentinel byte 0x00 at offset {offset}")]
    SentinelInPattern { offset: usize },

    /// A serialized index blob is malformed
    #[error("invalid index blob: {0}")]
    Format(String),

    /// A serialized index blob was written by an incompatible format version
    #[error("unsupported index version: expected {expected}, got {actual}")]
    UnsupportedVersion { expected: u32, actual: u32 },

    /// IO error while reading or writing a serialized index
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for FMX operations
pub type Result<T> = std::result::Result<T, FmxError>;

impl FmxError {
    /// Check if this error was raised while building an index
    pub fn is_construction_error(&self) -> bool {
        matches!(self, FmxError::SentinelInInput { .. })
    }

    /// Check if this error was raised at query entry
    pub fn is_query_error(&self) -> bool {
        matches!(self, FmxError::SentinelInPattern { .. })
    }
}
