//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.  Lock and geometry operations never produce errors
//! at all; only configuration and parsing do.

use thiserror::Error;

use crate::GroupId;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("group {0} not found")]
    GroupNotFound(GroupId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `mz-core`.
pub type CoreResult<T> = Result<T, CoreError>;
