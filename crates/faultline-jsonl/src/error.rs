//! Error types for faultline-jsonl operations.

use std::io;
use thiserror::Error;

/// The error type for faultline-jsonl operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A line is not valid UTF-8.
    #[error("line {line_number}: invalid UTF-8: {source}")]
    InvalidUtf8 {
        /// 1-based number of the offending line.
        line_number: usize,
        /// The decode failure.
        source: std::str::Utf8Error,
    },

    /// A line could not be decoded in strict mode.
    #[error("Invalid JSONL format: {0}")]
    InvalidFormat(String),
}

/// A specialized Result type for faultline-jsonl operations.
pub type Result<T> = std::result::Result<T, Error>;
