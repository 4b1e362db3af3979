//! Error types for the preparation pipelines.

use thiserror::Error;

/// Top-level preparation error.
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Sampling error: {0}")]
    Sampling(#[from] SamplingError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Quote feed errors.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Cannot coerce {field} value {value:?} in row {row}")]
    Coercion {
        field: &'static str,
        value: String,
        row: usize,
    },

    #[error("Invalid fractal: {0}")]
    InvalidFractal(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP status {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Resampling errors.
#[derive(Error, Debug, PartialEq)]
pub enum SamplingError {
    #[error("Unknown sampling method {0}")]
    UnknownMethod(String),

    #[error("Target value {target} has no samples, sampling ratio is undefined")]
    DegenerateRatio { target: f64 },

    #[error("Ratio estimation needs binary labels, found {classes} classes")]
    NonBinaryLabels { classes: usize },

    #[error("No class other than target value {target} to compare against")]
    MissingComparisonClass { target: f64 },

    #[error("Class {class} needs at least {required} samples, has {available}")]
    InsufficientSamples {
        class: f64,
        required: usize,
        available: usize,
    },

    #[error("Training set has no labels")]
    MissingLabels,

    #[error("Invalid sampling ratio: {0}")]
    InvalidRatio(f64),

    #[error("Model fitting failed: {0}")]
    Model(String),
}

/// Dataset loading errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Shape mismatch: {rows} feature rows, {labels} labels")]
    ShapeMismatch { rows: usize, labels: usize },

    #[error("Non-numeric value {value:?} in column {column}, row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },
}

/// Result type alias for preparation operations.
pub type PrepResult<T> = Result<T, PrepError>;
