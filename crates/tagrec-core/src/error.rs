//! Error types for tagrec operations.

use thiserror::Error;

/// Errors that can occur during dataset preparation, training, or scoring.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from the filesystem
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Catalog file does not exist
    #[error("catalog file not found: {0}")]
    CatalogNotFound(String),

    /// A required catalog column is missing from the CSV header
    #[error("catalog is missing required column '{0}'")]
    MissingColumn(String),

    /// No catalog row survived tag parsing
    #[error("empty dataset: no recipe carries at least one tag")]
    EmptyDataset,

    /// A recommendation query was issued with no tags
    #[error("empty tag query: at least one preferred tag is required")]
    EmptyTagQuery,

    /// Embedding dimensions do not agree
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension the operation required
        expected: usize,
        /// Dimension actually provided
        actual: usize,
    },

    /// Invalid training configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Model artifact could not be decoded
    #[error("artifact format error: {0}")]
    ArtifactFormat(String),

    /// Model artifact was written by an incompatible version
    #[error("unsupported artifact version {found} (expected {expected})")]
    ArtifactVersion {
        /// Version found in the artifact header
        found: u32,
        /// Version this build reads and writes
        expected: u32,
    },
}

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
