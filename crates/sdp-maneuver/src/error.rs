use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManeuverError {
    #[error("invalid builder configuration: {0}")]
    InvalidConfig(String),
}

pub type ManeuverResult<T> = Result<T, ManeuverError>;
