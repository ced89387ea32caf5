//! Error types for every pipeline stage.

use std::path::PathBuf;
use thiserror::Error;

/// Per-record extraction failure. Recoverable: the builder logs and skips.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid session JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by tabular stages. Always fatal for the stage.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("unparsable value {value:?} in column {column} at row {row}")]
    InvalidCell {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("label at row {row} is {value:?}; expected 0 or 1")]
    InvalidLabel { row: usize, value: Option<f64> },

    #[error("column sets differ: {left:?} vs {right:?}")]
    SchemaMismatch {
        left: Vec<String>,
        right: Vec<String>,
    },
}

#[derive(Debug, Error)]
pub enum PartitionError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("class {label} has only {count} row(s); at least 2 are required to stratify")]
    SparseClass { label: u8, count: usize },

    #[error("split of {rows} rows at fraction {fraction} leaves fewer rows than classes ({classes})")]
    TooFewRows {
        rows: usize,
        fraction: f64,
        classes: usize,
    },

    #[error("invalid split fraction: {0}")]
    InvalidFraction(f64),
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("artifact not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scaler artifact: {0}")]
    Scaler(#[from] serde_json::Error),

    #[error("feature count mismatch: expected {expected}, got {found}")]
    FeatureMismatch { expected: usize, found: usize },

    #[error("ONNX runtime error: {0}")]
    Onnx(String),

    #[error("shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("model produced {found} probabilities for {expected} rows")]
    OutputLength { expected: usize, found: usize },

    #[error(transparent)]
    Table(#[from] TableError),
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("threshold {0} outside [0, 1]")]
    InvalidThreshold(f64),

    #[error("{labels} labels for {probabilities} probabilities")]
    LengthMismatch { labels: usize, probabilities: usize },

    #[error("evaluation set is empty")]
    Empty,

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unparsable config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
