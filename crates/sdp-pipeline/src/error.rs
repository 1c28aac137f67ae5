use sdp_maneuver::ManeuverError;
use sdp_network::NetworkError;
use sdp_output::OutputError;
use sdp_traffic::TrafficError;
use sdp_vendor::VendorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline configuration error: {0}")]
    Config(String),

    /// A stage asked for data an earlier checkpoint already dropped.
    #[error("{0} was requested after it was released")]
    Released(&'static str),

    #[error(transparent)]
    Vendor(#[from] VendorError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Maneuver(#[from] ManeuverError),

    #[error(transparent)]
    Traffic(#[from] TrafficError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
