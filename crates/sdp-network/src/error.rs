//! Network error type.

use thiserror::Error;

use sdp_core::{CoreError, StreetId};

/// Errors produced by `sdp-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("street {0} not found in edge table")]
    StreetNotFound(StreetId),

    #[error("edge table holds {0} edges, more than an EdgeId can address")]
    TooManyEdges(usize),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
