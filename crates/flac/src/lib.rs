//! FLAC `STREAMINFO` metadata block decoding.
//!
//! <https://www.rfc-editor.org/rfc/rfc9639.html#section-8.2>
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(unreachable_pub)]

use std::io;

use byteorder::{BigEndian, ReadBytesExt};
use erlab_bytes_util::BitReader;

/// The `fLaC` stream marker.
pub const STREAM_MARKER: &[u8; 4] = b"fLaC";

/// The `STREAMINFO` block body.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamInfo {
    /// Minimum block size in samples.
    pub min_block_size: u16,
    /// Maximum block size in samples.
    pub max_block_size: u16,
    /// Minimum frame size in bytes, 0 if unknown.
    pub min_frame_size: u32,
    /// Maximum frame size in bytes, 0 if unknown.
    pub max_frame_size: u32,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of channels, 1 to 8.
    pub channels: u8,
    /// Bits per sample, 4 to 32.
    pub bits_per_sample: u8,
    /// Total samples per channel, 0 if unknown.
    pub total_samples: u64,
    /// MD5 of the unencoded audio.
    pub md5: [u8; 16],
}

impl StreamInfo {
    /// Size of the block body.
    pub const SIZE: usize = 34;

    /// Locates the `STREAMINFO` body in a sequence header payload.
    ///
    /// The payload may be the bare body, or be preceded by the `fLaC`
    /// marker and/or a 4-byte metadata block header. The marker is only
    /// stripped when at least 38 bytes are present, and a block header is
    /// assumed when the next byte has a zero block type and 38 bytes remain.
    pub fn locate(data: &[u8]) -> Option<&[u8]> {
        let mut offset = 0;
        if data.len() >= Self::SIZE + 4 && data.starts_with(STREAM_MARKER) {
            offset = STREAM_MARKER.len();
        }

        if offset + 4 + Self::SIZE <= data.len() && data[offset] & 0x7F == 0 {
            offset += 4;
        }

        data.get(offset..offset + Self::SIZE)
    }

    /// Parses a `STREAMINFO` body.
    pub fn parse(mut reader: impl io::Read) -> io::Result<Self> {
        let min_block_size = reader.read_u16::<BigEndian>()?;
        let max_block_size = reader.read_u16::<BigEndian>()?;
        let min_frame_size = reader.read_u24::<BigEndian>()?;
        let max_frame_size = reader.read_u24::<BigEndian>()?;

        let mut bit_reader = BitReader::new(&mut reader);
        let sample_rate = bit_reader.read_bits(20)? as u32;
        let channels = bit_reader.read_bits(3)? as u8 + 1;
        let bits_per_sample = bit_reader.read_bits(5)? as u8 + 1;
        let total_samples = bit_reader.read_bits(36)?;

        let mut md5 = [0; 16];
        reader.read_exact(&mut md5)?;

        Ok(Self {
            min_block_size,
            max_block_size,
            min_frame_size,
            max_frame_size,
            sample_rate,
            channels,
            bits_per_sample,
            total_samples,
            md5,
        })
    }
}
