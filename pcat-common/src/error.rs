//! Common error types for PCAT

use std::path::PathBuf;

use thiserror::Error;

use crate::model::IdentityKey;

/// Common result type for PCAT operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the PCAT tools
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fixture document could not be loaded, processed or saved
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Price point failed validation
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Quantity ranges could not be normalized
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Validation failures when reading a single price point
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Price points must be JSON objects
    #[error("price point is not a JSON object")]
    NotAnObject,

    /// minQuantity / maxQuantity present but not a positive integer
    #[error("{field} must be a positive integer, got {value}")]
    InvalidQuantity { field: &'static str, value: String },

    /// Identity field present but not a string
    #[error("{field} must be a string, got {value}")]
    InvalidIdentityField { field: &'static str, value: String },
}

/// Inputs the range normalizer refuses to rewrite
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// Two ranged price points of one identity start at the same quantity.
    ///
    /// Rewriting would give the first of them an empty range
    /// (`maxQuantity = minQuantity - 1`).
    #[error("duplicate minQuantity {min_quantity} in group {identity}")]
    DuplicateMinimum {
        identity: IdentityKey,
        min_quantity: u64,
    },

    /// The only ranged point of a group has a maximum below its minimum.
    ///
    /// Lone ranges pass through unchanged, so there is nothing to repair it with.
    #[error("maxQuantity {max} is below minQuantity {min} in group {identity}")]
    InvertedRange {
        identity: IdentityKey,
        min: u64,
        max: u64,
    },
}

/// Failure inside one pricing container
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("price point {index}: {source}")]
    Point {
        index: usize,
        #[source]
        source: ModelError,
    },

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Per-document failures; each one leaves the file on disk untouched
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Root is not an object, or the container collection is absent / not an array
    #[error("Missing or malformed container collection '{field}'")]
    MissingCollection { field: String },

    #[error("Container {id}: {source}")]
    Container {
        id: String,
        #[source]
        source: ContainerError,
    },
}
