//! Error types for sdp-output.

use thiserror::Error;

/// Errors that can occur when writing output tables.  All are fatal.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("table {0} was never created")]
    UnknownTable(String),

    #[error("table {0} already exists")]
    DuplicateTable(String),

    #[error("table {table}: row has {got} values, schema has {expected} columns")]
    RowWidth { table: String, expected: usize, got: usize },

    #[error("writer already finished")]
    Finished,

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "parquet")]
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[cfg(feature = "parquet")]
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
