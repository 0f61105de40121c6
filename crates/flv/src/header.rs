//! FLV file header.

use std::io;

use serde_derive::Serialize;

use crate::error::FlvError;
use crate::reader::TrackedReader;

/// The FLV header.
/// Whenever a FLV file is read these are the first 9 bytes of the file.
///
/// Defined by:
/// - Legacy FLV spec, Annex E.2 - The FLV Header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlvHeader {
    /// The version of the FLV file.
    pub version: u8,
    /// Whether the FLV file contains audio tags.
    pub has_audio: bool,
    /// Whether the FLV file contains video tags.
    pub has_video: bool,
    /// Offset of the first previous-tag-size field, normally 9.
    pub data_offset: u32,
}

impl FlvHeader {
    /// Size of the fixed header.
    pub const SIZE: usize = 9;
    /// The `FLV` signature.
    pub const SIGNATURE: [u8; 3] = *b"FLV";

    /// Parses the fixed 9 byte header.
    pub fn parse(bytes: &[u8; Self::SIZE]) -> Result<Self, FlvError> {
        let signature = [bytes[0], bytes[1], bytes[2]];
        if signature != Self::SIGNATURE {
            return Err(FlvError::InvalidSignature(signature));
        }

        let flags = bytes[4];
        let data_offset = u32::from_be_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]);

        if (data_offset as usize) < Self::SIZE {
            return Err(FlvError::InvalidDataOffset(data_offset));
        }

        Ok(Self {
            version: bytes[3],
            has_audio: (flags & 0b0000_0100) != 0,
            has_video: (flags & 0b0000_0001) != 0,
            data_offset,
        })
    }

    /// Reads the header and skips forward to `data_offset`.
    pub(crate) fn demux<R: io::Read>(reader: &mut TrackedReader<R>) -> Result<Self, FlvError> {
        let header = Self::parse(&reader.read_array("header")?)?;

        let extra = header.data_offset as u64 - Self::SIZE as u64;
        if extra > 0 {
            tracing::debug!(extra, "skipping extra header bytes");
            reader.discard(extra, "header")?;
        }

        Ok(header)
    }
}
