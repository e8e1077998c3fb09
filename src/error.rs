use std::path::PathBuf;
use thiserror::Error;

/// The main error type for sweepnorm operations.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a regular file: {path}")]
    NotFound { path: PathBuf },

    #[error(
        "Failed to read sweep file {path} (multi-sweep forced: {forced}; multi-sweep disabled: {plain})"
    )]
    UnreadableSweepFile {
        path: PathBuf,
        forced: String,
        plain: String,
    },

    #[error("Unsupported container version in {path}: {found}")]
    UnsupportedVersion { path: PathBuf, found: String },

    #[error("Unsupported sweep dimension in {path}: {count} swept axes (expected 1 or 2)")]
    UnsupportedDimension { path: PathBuf, count: usize },

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("Channel shape mismatch: '{a}' is {a_shape:?} but '{b}' is {b_shape:?}")]
    ShapeMismatch {
        a: String,
        a_shape: Vec<usize>,
        b: String,
        b_shape: Vec<usize>,
    },

    #[error("Failed to read HDF5 container {path}: {message}")]
    Hdf5 { path: PathBuf, message: String },

    #[error("Plot cache error: {source}")]
    Cache {
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to write report JSON: {source}")]
    JsonWrite {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write channel CSV to {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl From<rusqlite::Error> for SweepError {
    fn from(source: rusqlite::Error) -> Self {
        SweepError::Cache { source }
    }
}
