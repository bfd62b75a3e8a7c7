//! Error type shared by every dataset operation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::dataset::idmap::ExternalId;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DatasetError>;

/// Errors raised while loading, assembling, or splitting a dataset.
///
/// Every variant is fatal for the operation that produced it; nothing in the
/// pipeline retries or returns partial results.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// I/O error from file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Delimited-text reader error.
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// A cell could not be parsed as the expected numeric type.
    #[error("{path}:{line}: column {column} value '{value}' is not a valid {expected}")]
    Parse {
        /// File the row came from.
        path: PathBuf,
        /// One-based line number of the row.
        line: u64,
        /// Zero-based column index of the cell.
        column: usize,
        /// The raw cell text.
        value: String,
        /// Name of the expected type.
        expected: &'static str,
    },
    /// A row is narrower than the file layout requires.
    #[error("{path}:{line}: expected {expected} columns, found {found}")]
    MissingColumn {
        /// File the row came from.
        path: PathBuf,
        /// One-based line number of the row.
        line: u64,
        /// Column count the layout requires.
        expected: usize,
        /// Column count actually present.
        found: usize,
    },
    /// The feature table has a header but no data rows.
    #[error("feature table {path} contains no data rows")]
    EmptyDataset {
        /// Path of the feature table.
        path: PathBuf,
    },
    /// An edge endpoint is absent from the feature table and the active
    /// policy refuses to alias or drop it.
    #[error("{path}:{line}: edge references unknown node id {id}")]
    UnknownNodeId {
        /// Path of the edge file.
        path: PathBuf,
        /// One-based line number of the edge row.
        line: u64,
        /// The unresolved external id.
        id: ExternalId,
    },
    /// Requested fold index is outside `[0, n_splits)`.
    #[error("fold_idx must be from 0 to {}, got {fold_idx}", .n_splits - 1)]
    FoldOutOfRange {
        /// The requested fold.
        fold_idx: usize,
        /// Number of folds produced by the splitter.
        n_splits: usize,
    },
    /// Fewer records than folds.
    #[error("cannot split {samples} samples into {n_splits} folds")]
    NotEnoughSamples {
        /// Number of records offered to the splitter.
        samples: usize,
        /// Number of folds requested.
        n_splits: usize,
    },
    /// Caller-supplied argument is invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
