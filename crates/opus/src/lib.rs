//! Opus identification header decoding.
//!
//! RFC 7845 - 5.1
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(unreachable_pub)]

use std::io;

use byteorder::{LittleEndian, ReadBytesExt};

/// The `OpusHead` identification header, up to the mapping family.
///
/// The channel mapping table that follows for families other than 0 is not
/// decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct OpusHead {
    /// Format version, 1 for this revision of the specification.
    pub version: u8,
    /// Output channel count.
    pub channel_count: u8,
    /// Samples at 48 kHz to discard from the decoder output at the start.
    pub pre_skip: u16,
    /// Sample rate of the original input, informational only.
    pub input_sample_rate: u32,
    /// Gain to apply to the output, Q7.8 dB.
    pub output_gain: i16,
    /// Channel mapping family.
    pub channel_mapping_family: u8,
}

impl OpusHead {
    /// Magic signature at the start of the header.
    pub const MAGIC: &'static [u8; 8] = b"OpusHead";

    /// Size of the header up to and including the mapping family.
    pub const MIN_SIZE: usize = 19;

    /// Parses an `OpusHead`. Fails with [`io::ErrorKind::InvalidData`] if the
    /// magic signature does not match.
    pub fn parse(mut reader: impl io::Read) -> io::Result<Self> {
        let mut magic = [0; 8];
        reader.read_exact(&mut magic)?;
        if &magic != Self::MAGIC {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "missing OpusHead signature"));
        }

        Ok(Self {
            version: reader.read_u8()?,
            channel_count: reader.read_u8()?,
            pre_skip: reader.read_u16::<LittleEndian>()?,
            input_sample_rate: reader.read_u32::<LittleEndian>()?,
            output_gain: reader.read_i16::<LittleEndian>()?,
            channel_mapping_family: reader.read_u8()?,
        })
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use std::io;

    use crate::OpusHead;

    #[rustfmt::skip]
    const OPUS_HEAD: [u8; 19] = [
        b'O', b'p', b'u', b's', b'H', b'e', b'a', b'd',
        0x01, // version
        0x02, // channels
        0x38, 0x01, // pre-skip 312
        0x80, 0xbb, 0x00, 0x00, // 48000 Hz
        0x00, 0xff, // output gain -256
        0x00, // mapping family
    ];

    #[test]
    fn test_opus_head_parse() {
        let head = OpusHead::parse(&OPUS_HEAD[..]).unwrap();

        insta::assert_debug_snapshot!(head, @r"
        OpusHead {
            version: 1,
            channel_count: 2,
            pre_skip: 312,
            input_sample_rate: 48000,
            output_gain: -256,
            channel_mapping_family: 0,
        }
        ");
    }

    #[test]
    fn test_opus_head_bad_magic() {
        let mut data = OPUS_HEAD;
        data[0] = b'o';

        let err = OpusHead::parse(&data[..]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_opus_head_truncated() {
        let err = OpusHead::parse(&OPUS_HEAD[..18]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
