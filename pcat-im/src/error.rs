//! Error types for pcat-im

use pcat_common::{DocumentError, ModelError};
use thiserror::Error;

/// Import failures; line numbers are 1-based and count blank lines
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Input has no header row")]
    EmptyInput,

    #[error("Header column {position} has no name")]
    BlankColumn { position: usize },

    #[error("Header names column '{column}' twice")]
    DuplicateColumn { column: String },

    #[error("Header has no '{column}' column")]
    MissingGroupColumn { column: String },

    #[error("Line {line}: unterminated quoted cell")]
    UnterminatedQuote { line: usize },

    #[error("Line {line}: {found} cells but the header has {expected}")]
    TooManyCells {
        line: usize,
        found: usize,
        expected: usize,
    },

    #[error("Line {line}: missing {column}")]
    MissingGroupId { line: usize, column: String },

    #[error("Line {line}: {column} must be a positive integer, got '{value}'")]
    InvalidInteger {
        line: usize,
        column: String,
        value: String,
    },

    #[error("Line {line}: {column} must be a number, got '{value}'")]
    InvalidNumber {
        line: usize,
        column: String,
        value: String,
    },

    #[error("Line {line}: {column} must be a YYYY-MM-DD date or RFC 3339 timestamp, got '{value}'")]
    InvalidDate {
        line: usize,
        column: String,
        value: String,
    },

    #[error("Line {line}: {source}")]
    InvalidPoint {
        line: usize,
        #[source]
        source: ModelError,
    },

    /// Normalizing the imported document failed
    #[error(transparent)]
    Document(#[from] DocumentError),
}
