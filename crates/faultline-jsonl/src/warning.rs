//! Non-fatal problems found while reading JSONL data.
//!
//! A [`Warning`] describes a line that was skipped during resilient loading.
//! Loading continues past it; the caller decides how loudly to report it.

use std::fmt;

/// A skipped line and the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The line is not syntactically valid JSON.
    MalformedJson {
        /// The 1-based line number.
        line_number: usize,
        /// The parser's description of the problem.
        error: String,
    },

    /// The line is valid JSON but does not have the expected record shape.
    SkippedLine {
        /// The 1-based line number.
        line_number: usize,
        /// Why the record was rejected.
        reason: String,
    },
}

impl Warning {
    /// Returns the line number associated with this warning.
    ///
    /// ```
    /// use faultline_jsonl::Warning;
    ///
    /// let warning = Warning::MalformedJson {
    ///     line_number: 42,
    ///     error: "unexpected token".to_string(),
    /// };
    /// assert_eq!(warning.line_number(), 42);
    /// ```
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedJson { line_number, .. } | Self::SkippedLine { line_number, .. } => {
                *line_number
            }
        }
    }

    /// Returns a static string identifying the warning kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedJson { .. } => "malformed_json",
            Self::SkippedLine { .. } => "skipped_line",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedJson { line_number, error } => {
                write!(f, "line {line_number}: malformed JSON: {error}")
            }
            Self::SkippedLine {
                line_number,
                reason,
            } => write!(f, "line {line_number}: skipped: {reason}"),
        }
    }
}

impl std::error::Error for Warning {}
