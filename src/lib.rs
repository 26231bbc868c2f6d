//! chunkcopy: word- and vector-wide byte movement for blocked compressors.
//!
//! - [`memcpy::fast_copy`]: non-overlapping copy dispatched by size class
//! - [`memmove::safe_copy`]: forward copy that tolerates any overlap
//! - [`backref::chunk_copy`]: LZ back-reference expansion
//! - [`bitshuffle`]: bit transpose of typed arrays and its inverse
//!
//! The raw routines take pointers and return the end of the destination so
//! calls chain; [`mem`] wraps them over slices.

pub mod backref;
pub mod bitshuffle;
pub mod copy;
pub mod error;
pub mod mem;
pub mod memcpy;
pub mod memmove;
pub mod memset;
pub mod simd;

pub use error::{Error, Result};
