use std::io;

use byteorder::ReadBytesExt;
use bytes::Bytes;
use erlab_bytes_util::{BitReader, BytesCursorExt};

use crate::{SequenceHeaderObu, find_sequence_header};

/// AV1 Codec Configuration Record
///
/// <https://aomediacodec.github.io/av1-isobmff/#av1codecconfigurationbox-syntax>
#[derive(Debug, Clone, PartialEq)]
pub struct AV1CodecConfigurationRecord {
    /// Always set in a well formed record.
    pub marker: bool,
    /// The record version, currently 1.
    pub version: u8,
    /// `seq_profile` of the sequence header.
    pub seq_profile: u8,
    /// `seq_level_idx[0]` of the sequence header.
    pub seq_level_idx_0: u8,
    /// `seq_tier[0]` of the sequence header.
    pub seq_tier_0: bool,
    /// `high_bitdepth` from the color config.
    pub high_bitdepth: bool,
    /// `twelve_bit` from the color config.
    pub twelve_bit: bool,
    /// `mono_chrome` from the color config.
    pub monochrome: bool,
    /// `subsampling_x` from the color config.
    pub chroma_subsampling_x: bool,
    /// `subsampling_y` from the color config.
    pub chroma_subsampling_y: bool,
    /// `chroma_sample_position` from the color config.
    pub chroma_sample_position: u8,
    /// `initial_presentation_delay_minus_one`, when
    /// `initial_presentation_delay_present` is set.
    pub initial_presentation_delay_minus_one: Option<u8>,
    /// Zero or more OBUs, normally a sequence header and metadata.
    pub config_obu: Bytes,
}

impl AV1CodecConfigurationRecord {
    /// Demuxes the record from a byte stream. Everything after the fixed
    /// four bytes becomes [`Self::config_obu`].
    pub fn demux(reader: &mut io::Cursor<Bytes>) -> io::Result<Self> {
        let mut bit_reader = BitReader::new(reader);

        let marker = bit_reader.read_bit()?;
        let version = bit_reader.read_bits(7)? as u8;

        let seq_profile = bit_reader.read_bits(3)? as u8;
        let seq_level_idx_0 = bit_reader.read_bits(5)? as u8;

        let seq_tier_0 = bit_reader.read_bit()?;
        let high_bitdepth = bit_reader.read_bit()?;
        let twelve_bit = bit_reader.read_bit()?;
        let monochrome = bit_reader.read_bit()?;
        let chroma_subsampling_x = bit_reader.read_bit()?;
        let chroma_subsampling_y = bit_reader.read_bit()?;
        let chroma_sample_position = bit_reader.read_bits(2)? as u8;

        bit_reader.skip_bits(3)?; // reserved
        let initial_presentation_delay_present = bit_reader.read_bit()?;
        let initial_presentation_delay_minus_one = bit_reader.read_bits(4)? as u8;

        let reader = bit_reader.into_inner();
        let config_obu = reader.extract_remaining();

        Ok(Self {
            marker,
            version,
            seq_profile,
            seq_level_idx_0,
            seq_tier_0,
            high_bitdepth,
            twelve_bit,
            monochrome,
            chroma_subsampling_x,
            chroma_subsampling_y,
            chroma_sample_position,
            initial_presentation_delay_minus_one: initial_presentation_delay_present
                .then_some(initial_presentation_delay_minus_one),
            config_obu,
        })
    }

    /// Returns 8, 10 or 12 from the `high_bitdepth` and `twelve_bit` flags.
    pub const fn bit_depth(&self) -> u8 {
        match (self.high_bitdepth, self.twelve_bit) {
            (true, true) => 12,
            (true, false) => 10,
            _ => 8,
        }
    }

    /// Finds and parses the sequence header among the configuration OBUs.
    pub fn sequence_header(&self) -> Option<SequenceHeaderObu> {
        find_sequence_header(&self.config_obu)
    }
}
