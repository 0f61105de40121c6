//! Error types.

/// Error type for FLV processing.
///
/// Every variant is fatal for the walk that produced it. Problems inside a
/// codec record or an `onMetaData` value never surface here.
#[derive(Debug, thiserror::Error)]
pub enum FlvError {
    /// IO error.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    /// The FLV signature (magic bytes) is invalid.
    #[error("invalid signature in header: {0:?}")]
    InvalidSignature([u8; 3]),
    /// The data offset in the FLV header is invalid.
    #[error("invalid data offset: {0}")]
    InvalidDataOffset(u32),
    /// The stream ended inside a header, payload or trailer.
    #[error("truncated {context} at offset {offset}")]
    Truncated {
        /// What was being read.
        context: &'static str,
        /// Absolute offset at which the read started.
        offset: u64,
    },
    /// A script data payload whose first value could not be decoded.
    #[error("amf0: {0}")]
    Amf0(#[from] erlab_amf0::Amf0Error),
}
