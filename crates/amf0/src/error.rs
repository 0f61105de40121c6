//! AMF0 error type.

use std::io;
use std::num::TryFromIntError;

/// AMF0 error.
#[derive(thiserror::Error, Debug)]
pub enum Amf0Error {
    /// IO error while encoding.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// Element (string or sequence) is too long to be encoded.
    #[error("element is too long: {0}")]
    TooLong(#[from] TryFromIntError),
    /// The buffer ended before a field was complete.
    #[error("truncated {context} at offset {offset}")]
    Truncated {
        /// The field that was being read.
        context: &'static str,
        /// Offset of the read that failed.
        offset: usize,
    },
    /// A marker this decoder does not handle.
    #[error("unsupported marker 0x{marker:02x} at offset {offset}")]
    UnsupportedMarker {
        /// The raw marker byte.
        marker: u8,
        /// Offset of the marker byte.
        offset: usize,
    },
    /// Objects and arrays are nested deeper than [`MAX_NESTING_DEPTH`](crate::MAX_NESTING_DEPTH).
    #[error("nesting too deep at offset {offset}")]
    TooDeep {
        /// Offset of the value that exceeded the limit.
        offset: usize,
    },
}
