//! Base error type.
//!
//! Sub-crates define their own enums and wrap `CoreError` as one variant via
//! `#[from]`.

use thiserror::Error;

/// Errors raised by the core primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("geometry error: {0}")]
    Geometry(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `sdp-core`.
pub type CoreResult<T> = Result<T, CoreError>;
