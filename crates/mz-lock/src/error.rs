//! Lock-layer error type.
//!
//! Lock operations themselves never fail; the only error is one reported by
//! an external signal sink, which the lock layer logs and otherwise ignores.

use thiserror::Error;

use mz_spatial::RegionKey;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("signal sink rejected {key}: {reason}")]
    Rejected { key: RegionKey, reason: String },

    #[error("signal sink unavailable")]
    Unavailable,
}
