//! Error types for annotation record import/export.

use thiserror::Error;

/// Errors that can occur while reading or writing annotation records.
///
/// Row numbers are 1-based and count data rows only, not the header.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader or writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Input ended before the header row
    #[error("Missing header row")]
    MissingHeader,

    /// Row has fewer fields than a record needs
    #[error("Row {row}: expected {expected} fields, found {found}")]
    TooFewFields {
        /// Data row number
        row: usize,
        /// Number of fields required
        expected: usize,
        /// Number of fields present
        found: usize,
    },

    /// Field is not an integer
    #[error("Row {row}: invalid {field} value '{value}'")]
    InvalidNumber {
        /// Data row number
        row: usize,
        /// Column name
        field: &'static str,
        /// Offending text
        value: String,
    },

    /// Row describes a box with no area
    #[error("Row {row}: box has zero width or height")]
    EmptyBox {
        /// Data row number
        row: usize,
    },
}
