//! Error types for the bit transposes.

use thiserror::Error;

/// Result type alias for the bit transposes.
pub type Result<T> = core::result::Result<T, Error>;

/// Bitshuffle failure. Byte-movement routines never fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The SSE2 variant was requested on a host without SSE2.
    #[error("SSE2 bitshuffle requested but the host has no SSE2 support")]
    MissingSse2,

    /// Element count is not a multiple of eight.
    #[error("element count {size} is not a multiple of 8")]
    SizeNotMultipleOfEight { size: usize },

    /// An input, output, or scratch buffer is shorter than `size * elem_size`.
    #[error("{buffer} buffer too small: need {required} bytes, got {provided}")]
    BufferTooSmall {
        buffer: &'static str,
        required: usize,
        provided: usize,
    },
}

impl Error {
    /// Numbered code used by callers that speak integer status codes.
    /// Always negative.
    pub fn code(&self) -> i64 {
        match self {
            Error::MissingSse2 => -11,
            Error::SizeNotMultipleOfEight { .. } => -80,
            Error::BufferTooSmall { .. } => -90,
        }
    }
}

impl From<Error> for i64 {
    fn from(err: Error) -> i64 {
        err.code()
    }
}
