use std::io::{
    Read, {self},
};

use byteorder::{BigEndian, ReadBytesExt};
use bytes::Bytes;
use erlab_bytes_util::{BitReader, BytesCursorExt};
use nutype_enum::nutype_enum;

#[derive(Debug, Clone, PartialEq)]
/// HEVC Decoder Configuration Record
/// ISO/IEC 14496-15:2022(E) - 8.3.2.1
pub struct HEVCDecoderConfigurationRecord {
    /// The `configuration_version` as a u8. Matches the field as defined in ISO/IEC 23008-2.
    pub configuration_version: u8,

    /// The `general_profile_space` as a u8. Matches the field as defined in ISO/IEC 23008-2.
    pub general_profile_space: u8,

    /// The `general_tier_flag` as a bool. Matches the field as defined in ISO/IEC 23008-2.
    pub general_tier_flag: bool,

    /// The `general_profile_idc` as a u8. Matches the field as defined in ISO/IEC 23008-2.
    pub general_profile_idc: u8,

    /// The `general_profile_compatibility_flags` as a u32, flag 0 in the most significant bit.
    pub general_profile_compatibility_flags: u32,

    /// The `general_constraint_indicator_flags` as a u64 (48 bits used).
    pub general_constraint_indicator_flags: u64,

    /// The `general_level_idc` as a u8. Matches the field as defined in ISO/IEC 23008-2.
    pub general_level_idc: u8,

    /// The `min_spatial_segmentation_idc` as a u16. Matches the field as defined in ISO/IEC 23008-2.
    pub min_spatial_segmentation_idc: u16,

    /// The `chroma_format_idc` as a u8. Matches the field as defined in ISO/IEC 23008-2.
    pub chroma_format_idc: u8,

    /// The `bit_depth_luma_minus8` as a u8. Matches the field as defined in ISO/IEC 23008-2.
    pub bit_depth_luma_minus8: u8,

    /// The `bit_depth_chroma_minus8` as a u8. Matches the field as defined in ISO/IEC 23008-2.
    pub bit_depth_chroma_minus8: u8,

    /// The `parallelism_type` as a u8.
    ///
    /// 0 means the stream supports mixed types of parallel decoding or otherwise.
    ///
    /// 1 means the stream supports slice based parallel decoding.
    ///
    /// 2 means the stream supports tile based parallel decoding.
    ///
    /// 3 means the stream supports entropy coding sync based parallel decoding.
    pub parallelism_type: u8,

    /// The `avg_frame_rate` in frames per 256 seconds, 0 if unspecified.
    pub avg_frame_rate: u16,

    /// The `constant_frame_rate` as a u8.
    ///
    /// 0 means the stream might have a constant frame rate.
    ///
    /// 1 means the stream has a constant framerate.
    ///
    /// 2 means the representation of each temporal layer in the stream has a constant framerate.
    pub constant_frame_rate: u8,

    /// The `num_temporal_layers` as a u8.
    ///
    /// 0 means the stream might be temporally scalable.
    ///
    /// 1 means the stream is NOT temporally scalable.
    ///
    /// 2 or more means the stream is temporally scalable, and the count of temporal layers is equal to this value.
    pub num_temporal_layers: u8,

    /// The `temporal_id_nested` as a bool.
    pub temporal_id_nested: bool,

    /// The `length_size_minus_one` is the u8 length of the NALUnitLength minus one.
    pub length_size_minus_one: u8,

    /// The parameter set arrays, in stream order.
    pub arrays: Vec<NaluArray>,
}

#[derive(Debug, Clone, PartialEq)]
/// Nalu Array Structure
/// ISO/IEC 14496-15:2022(E) - 8.3.2.1
pub struct NaluArray {
    /// Set when all NAL units of this type are in the array and none are in the stream.
    pub array_completeness: bool,
    /// The type of the NAL units in `nalus`.
    pub nal_unit_type: NaluType,
    /// The NAL units, each including its 2-byte header.
    pub nalus: Vec<Bytes>,
}

nutype_enum! {
    /// The parameter set NAL unit types that appear in a configuration record.
    /// ISO/IEC 23008-2:2020(E) - 7.4.2.2 (Table 7-1)
    pub enum NaluType(u8) {
        /// The Video Parameter Set.
        Vps = 32,
        /// The Sequence Parameter Set.
        Sps = 33,
        /// The Picture Parameter Set.
        Pps = 34,
        /// Prefix supplemental enhancement information.
        PrefixSei = 39,
        /// Suffix supplemental enhancement information.
        SuffixSei = 40,
    }
}

impl HEVCDecoderConfigurationRecord {
    /// Minimum size of a record with no parameter set arrays.
    pub const FIXED_SIZE: usize = 23;

    /// Demuxes an HEVCDecoderConfigurationRecord from a byte stream.
    pub fn demux(data: &mut io::Cursor<Bytes>) -> io::Result<Self> {
        let mut bit_reader = BitReader::new(data);

        let configuration_version = bit_reader.read_u8()?;
        let general_profile_space = bit_reader.read_bits(2)? as u8;
        let general_tier_flag = bit_reader.read_bit()?;
        let general_profile_idc = bit_reader.read_bits(5)? as u8;
        let general_profile_compatibility_flags = bit_reader.read_u32::<BigEndian>()?;
        let general_constraint_indicator_flags = bit_reader.read_u48::<BigEndian>()?;
        let general_level_idc = bit_reader.read_u8()?;

        bit_reader.skip_bits(4)?; // reserved_4bits
        let min_spatial_segmentation_idc = bit_reader.read_bits(12)? as u16;

        bit_reader.skip_bits(6)?; // reserved_6bits
        let parallelism_type = bit_reader.read_bits(2)? as u8;

        bit_reader.skip_bits(6)?; // reserved_6bits
        let chroma_format_idc = bit_reader.read_bits(2)? as u8;

        bit_reader.skip_bits(5)?; // reserved_5bits
        let bit_depth_luma_minus8 = bit_reader.read_bits(3)? as u8;

        bit_reader.skip_bits(5)?; // reserved_5bits
        let bit_depth_chroma_minus8 = bit_reader.read_bits(3)? as u8;

        let avg_frame_rate = bit_reader.read_u16::<BigEndian>()?;
        let constant_frame_rate = bit_reader.read_bits(2)? as u8;
        let num_temporal_layers = bit_reader.read_bits(3)? as u8;
        let temporal_id_nested = bit_reader.read_bit()?;
        let length_size_minus_one = bit_reader.read_bits(2)? as u8;

        let num_of_arrays = bit_reader.read_u8()?;

        let mut arrays = Vec::with_capacity(num_of_arrays as usize);

        for _ in 0..num_of_arrays {
            let array_completeness = bit_reader.read_bit()?;
            bit_reader.skip_bits(1)?; // reserved

            let nal_unit_type = bit_reader.read_bits(6)? as u8;

            let num_nalus = bit_reader.read_u16::<BigEndian>()?;

            let mut nalus = Vec::with_capacity(num_nalus as usize);

            for _ in 0..num_nalus {
                let nal_unit_length = bit_reader.read_u16::<BigEndian>()?;
                let mut data = vec![0; nal_unit_length as usize];
                bit_reader.read_exact(&mut data)?;
                nalus.push(data.into());
            }

            arrays.push(NaluArray {
                array_completeness,
                nal_unit_type: NaluType::from(nal_unit_type),
                nalus,
            });
        }

        Ok(HEVCDecoderConfigurationRecord {
            configuration_version,
            general_profile_space,
            general_tier_flag,
            general_profile_idc,
            general_profile_compatibility_flags,
            general_constraint_indicator_flags,
            general_level_idc,
            min_spatial_segmentation_idc,
            parallelism_type,
            chroma_format_idc,
            bit_depth_luma_minus8,
            bit_depth_chroma_minus8,
            avg_frame_rate,
            constant_frame_rate,
            num_temporal_layers,
            temporal_id_nested,
            length_size_minus_one,
            arrays,
        })
    }

    /// Returns the first SPS NAL unit carried in the record, if any.
    pub fn first_sps(&self) -> Option<&Bytes> {
        self.arrays
            .iter()
            .filter(|array| array.nal_unit_type == NaluType::Sps)
            .find_map(|array| array.nalus.first())
    }

    /// Reads the fixed header and the arrays up to the first SPS NAL unit,
    /// leaving the rest of the record unread.
    pub fn demux_first_sps(data: &mut io::Cursor<Bytes>) -> io::Result<Option<Bytes>> {
        data.extract_bytes(Self::FIXED_SIZE - 1)?;
        let num_of_arrays = data.read_u8()?;

        for _ in 0..num_of_arrays {
            let nal_unit_type = NaluType::from(data.read_u8()? & 0b0011_1111);
            let num_nalus = data.read_u16::<BigEndian>()?;

            for _ in 0..num_nalus {
                let nal_unit_length = data.read_u16::<BigEndian>()?;
                let nalu = data.extract_bytes(nal_unit_length as usize)?;
                if nal_unit_type == NaluType::Sps {
                    return Ok(Some(nalu));
                }
            }
        }

        Ok(None)
    }
}
