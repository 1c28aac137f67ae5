//! Vendor adapter error type.

use thiserror::Error;

use sdp_core::CoreError;
use sdp_network::NetworkError;
use sdp_traffic::TrafficError;

/// Fatal input problems.  Data-quality issues are warnings, not errors.
#[derive(Debug, Error)]
pub enum VendorError {
    #[error("input table {0} not found")]
    MissingTable(String),

    #[error("table {table}: {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },

    #[error("table {table}: street {street} has unusable geometry: {source}")]
    Geometry {
        table: &'static str,
        street: i64,
        #[source]
        source: CoreError,
    },

    #[error("table {table} has no {column} column")]
    MissingColumn { table: &'static str, column: &'static str },

    #[error("{0}")]
    Unsupported(String),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Traffic(#[from] TrafficError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type VendorResult<T> = Result<T, VendorError>;
