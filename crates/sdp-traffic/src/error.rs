//! Traffic error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrafficError {
    #[error("speed pattern {pattern} has {got} time slices, expected {expected}")]
    SliceCount { pattern: i64, expected: usize, got: usize },
}

pub type TrafficResult<T> = Result<T, TrafficError>;
