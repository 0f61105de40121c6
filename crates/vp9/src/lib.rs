//! VP9 codec configuration record (`vpcC` body) decoding.
//!
//! <https://www.webmproject.org/vp9/mp4/#vp-codec-configuration-box>
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(unreachable_pub)]

use std::io;

use byteorder::{BigEndian, ReadBytesExt};
use bytes::Bytes;
use erlab_bytes_util::{BitReader, BytesCursorExt};

/// VP Codec Configuration Record, without the full box version and flags.
#[derive(Debug, Clone, PartialEq)]
pub struct VpCodecConfigurationRecord {
    /// The VP9 profile, 0 to 3.
    pub profile: u8,
    /// The level, e.g. 31 for level 3.1.
    pub level: u8,
    /// Bit depth of luma and chroma samples, 8, 10 or 12.
    pub bit_depth: u8,
    /// 0 and 1 are 4:2:0 (vertical / colocated), 2 is 4:2:2, 3 is 4:4:4.
    pub chroma_subsampling: u8,
    /// `video_full_range_flag`
    pub video_full_range_flag: bool,
    /// ISO/IEC 23091-2 `ColourPrimaries`
    pub colour_primaries: u8,
    /// ISO/IEC 23091-2 `TransferCharacteristics`
    pub transfer_characteristics: u8,
    /// ISO/IEC 23091-2 `MatrixCoefficients`
    pub matrix_coefficients: u8,
    /// Codec initialization data, always empty for VP9. `None` when the
    /// declared size runs past the end of the record.
    pub codec_initialization_data: Option<Bytes>,
}

impl VpCodecConfigurationRecord {
    /// Size of the record without initialization data.
    pub const FIXED_SIZE: usize = 8;

    /// Demuxes a record. Fails only if fewer than [`Self::FIXED_SIZE`] bytes
    /// are available.
    pub fn demux(reader: &mut io::Cursor<Bytes>) -> io::Result<Self> {
        let profile = reader.read_u8()?;
        let level = reader.read_u8()?;

        let mut bit_reader = BitReader::new(&mut *reader);
        let bit_depth = bit_reader.read_bits(4)? as u8;
        let chroma_subsampling = bit_reader.read_bits(3)? as u8;
        let video_full_range_flag = bit_reader.read_bit()?;

        let colour_primaries = reader.read_u8()?;
        let transfer_characteristics = reader.read_u8()?;
        let matrix_coefficients = reader.read_u8()?;
        let codec_initialization_data_size = reader.read_u16::<BigEndian>()?;
        let codec_initialization_data = reader.extract_bytes(codec_initialization_data_size as usize).ok();

        Ok(Self {
            profile,
            level,
            bit_depth,
            chroma_subsampling,
            video_full_range_flag,
            colour_primaries,
            transfer_characteristics,
            matrix_coefficients,
            codec_initialization_data,
        })
    }
}
