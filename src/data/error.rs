use std::path::PathBuf;

use thiserror::Error;

/// Why a rental table could not be loaded.
///
/// Row numbers are 1-based data rows (the header is not counted).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Data file not found at {path}")]
    NotFound { path: PathBuf },
    #[error("Unsupported file extension '.{extension}' for {path}")]
    UnsupportedFormat { extension: String, path: PathBuf },
    #[error("Failed to read CSV file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Failed to read Parquet file {path}: {source}")]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },
    #[error("Failed to decode Arrow data in {path}: {source}")]
    Arrow {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },
    #[error("{path}, row {row}, column '{column}': invalid value '{value}'")]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },
    #[error("{path}, row {row}: cnt {total} != casual {casual} + registered {registered}")]
    InconsistentCounts {
        path: PathBuf,
        row: usize,
        total: u32,
        casual: u32,
        registered: u32,
    },
}
