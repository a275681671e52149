use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RingError {
    #[error("ring capacity must be greater than zero")]
    ZeroCapacity,
    #[error("failed to allocate {capacity} bytes of ring storage: {source}")]
    Allocation {
        capacity: usize,
        source: TryReserveError,
    },
    #[error("insufficient data: requested {requested} bytes, {available} buffered")]
    InsufficientData { requested: usize, available: usize },
    #[error("buffer full: requested {requested} bytes, {remaining} free")]
    BufferFull { requested: usize, remaining: usize },
    #[error("stream {op} failed after {transferred} bytes: {source}")]
    Endpoint {
        op: &'static str,
        transferred: usize,
        source: std::io::Error,
    },
}

impl RingError {
    /// Bytes committed by a stream-bound call before its endpoint failed.
    pub fn transferred(&self) -> Option<usize> {
        match self {
            Self::Endpoint { transferred, .. } => Some(*transferred),
            _ => None,
        }
    }

    pub fn is_endpoint(&self) -> bool {
        matches!(self, Self::Endpoint { .. })
    }
}

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("ring error: {0}")]
    Ring(#[from] RingError),
    #[error("writer accepted no bytes with {pending} bytes pending")]
    StalledWriter { pending: usize },
    #[error("flush failed: {0}")]
    Flush(std::io::Error),
    #[error("relay task failed: {0}")]
    Join(String),
}
