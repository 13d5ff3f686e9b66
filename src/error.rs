//! Error types for block encode and decode calls.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure a block call can report. None are retried internally, and on
/// any failure the bytes already written to the output must be discarded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed call parameters: empty input, zero capacity, unknown format.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Scratch state could not be allocated.
    #[error("allocation failed: could not allocate {requested_bytes} bytes")]
    OutOfMemory { requested_bytes: usize },

    /// The destination cannot hold the produced or declared size.
    #[error("output overflow: need {required} bytes, capacity is {capacity}")]
    OutputOverflow { required: usize, capacity: usize },

    /// Malformed compressed input.
    #[error("corrupt stream: {0}")]
    CorruptStream(&'static str),
}

impl Error {
    pub(crate) fn overflow(required: usize, capacity: usize) -> Self {
        Error::OutputOverflow { required, capacity }
    }
}
