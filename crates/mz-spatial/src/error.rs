//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced by `mz-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("unknown exclusion policy '{0}'")]
    UnknownPolicy(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
