use std::io;

use byteorder::ReadBytesExt;
use erlab_bytes_util::BitReader;
use erlab_expgolomb::BitReaderExpGolombExt;

use crate::{EmulationPreventionIo, NALUnitType};

/// Profiles whose SPS carries the chroma format, bit depth and scaling
/// matrix fields. 134 and 135 are the MFC high profiles.
const EXTENDED_PROFILES: [u8; 14] = [100, 110, 122, 244, 44, 83, 86, 118, 128, 138, 139, 144, 134, 135];

#[derive(Debug, Clone, PartialEq)]
/// The leading part of a Sequence Parameter Set, up to frame cropping.
/// ISO/IEC-14496-10-2022 - 7.3.2.1.1
pub struct Sps {
    /// The `profile_idc` as a u8.
    pub profile_idc: u8,
    /// The six `constraint_setN_flag`s followed by two reserved zero bits.
    pub constraint_flags: u8,
    /// The `level_idc` as a u8.
    pub level_idc: u8,
    /// The `seq_parameter_set_id`.
    pub seq_parameter_set_id: u64,
    /// Present only for the high profiles. Refer to [`SpsExtended`].
    pub ext: Option<SpsExtended>,
    /// The `pic_order_cnt_type`, in the range \[0, 2\].
    pub pic_order_cnt_type: u64,
    /// The `frame_mbs_only_flag`. When false the picture may be coded as two fields.
    pub frame_mbs_only_flag: bool,
    /// The crop rectangle, if `frame_cropping_flag` was set.
    pub frame_crop_info: Option<FrameCropInfo>,
    /// The displayed width in luma samples, after cropping.
    pub width: u64,
    /// The displayed height in luma samples, after cropping.
    pub height: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The frame cropping offsets, in crop units.
pub struct FrameCropInfo {
    /// `frame_crop_left_offset`
    pub left: u64,
    /// `frame_crop_right_offset`
    pub right: u64,
    /// `frame_crop_top_offset`
    pub top: u64,
    /// `frame_crop_bottom_offset`
    pub bottom: u64,
}

impl Sps {
    /// Parses an SPS NAL unit (including its 1-byte header) from a reader
    /// that still contains emulation prevention bytes.
    pub fn parse_with_emulation_prevention(mut reader: impl io::Read) -> io::Result<Self> {
        let nal_header = reader.read_u8()?;
        if nal_header & 0b1000_0000 != 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "forbidden zero bit is set"));
        }

        let nal_unit_type = NALUnitType::from(nal_header & 0b0001_1111);
        if nal_unit_type != NALUnitType::SPS {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("nal unit type is not SPS: {nal_unit_type:?}"),
            ));
        }

        Self::parse_rbsp(BitReader::new(EmulationPreventionIo::new(reader)))
    }

    fn parse_rbsp<T: io::Read>(mut bit_reader: BitReader<T>) -> io::Result<Self> {
        let profile_idc = bit_reader.read_u8()?;
        let constraint_flags = bit_reader.read_u8()?;
        let level_idc = bit_reader.read_u8()?;
        let seq_parameter_set_id = bit_reader.read_exp_golomb()?;

        let ext = if EXTENDED_PROFILES.contains(&profile_idc) {
            Some(SpsExtended::parse(&mut bit_reader)?)
        } else {
            None
        };

        bit_reader.read_exp_golomb()?; // log2_max_frame_num_minus4
        let pic_order_cnt_type = bit_reader.read_exp_golomb()?;
        if pic_order_cnt_type == 0 {
            bit_reader.read_exp_golomb()?; // log2_max_pic_order_cnt_lsb_minus4
        } else if pic_order_cnt_type == 1 {
            bit_reader.skip_bits(1)?; // delta_pic_order_always_zero_flag
            bit_reader.read_signed_exp_golomb()?; // offset_for_non_ref_pic
            bit_reader.read_signed_exp_golomb()?; // offset_for_top_to_bottom_field
            let num_ref_frames_in_pic_order_cnt_cycle = bit_reader.read_exp_golomb()?;
            for _ in 0..num_ref_frames_in_pic_order_cnt_cycle {
                bit_reader.read_signed_exp_golomb()?; // offset_for_ref_frame
            }
        }

        bit_reader.read_exp_golomb()?; // max_num_ref_frames
        bit_reader.skip_bits(1)?; // gaps_in_frame_num_value_allowed_flag
        let pic_width_in_mbs_minus1 = bit_reader.read_exp_golomb()?;
        let pic_height_in_map_units_minus1 = bit_reader.read_exp_golomb()?;
        let frame_mbs_only_flag = bit_reader.read_bit()?;
        if !frame_mbs_only_flag {
            bit_reader.skip_bits(1)?; // mb_adaptive_frame_field_flag
        }

        bit_reader.skip_bits(1)?; // direct_8x8_inference_flag

        let frame_crop_info = if bit_reader.read_bit()? {
            Some(FrameCropInfo {
                left: bit_reader.read_exp_golomb()?,
                right: bit_reader.read_exp_golomb()?,
                top: bit_reader.read_exp_golomb()?,
                bottom: bit_reader.read_exp_golomb()?,
            })
        } else {
            None
        };

        let chroma_format_idc = ext.as_ref().map_or(1, |ext| ext.chroma_format_idc);
        let frame_height_factor = 2 - frame_mbs_only_flag as u64;
        let (crop_unit_x, crop_unit_y) = if chroma_format_idc == 0 {
            (1, frame_height_factor)
        } else {
            (2, 2 * frame_height_factor)
        };

        let coded_width = (pic_width_in_mbs_minus1 + 1) * 16;
        let coded_height = frame_height_factor * (pic_height_in_map_units_minus1 + 1) * 16;

        let crop = frame_crop_info.unwrap_or(FrameCropInfo {
            left: 0,
            right: 0,
            top: 0,
            bottom: 0,
        });

        let width = crop
            .left
            .checked_add(crop.right)
            .and_then(|crop| crop.checked_mul(crop_unit_x))
            .and_then(|crop| coded_width.checked_sub(crop))
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "horizontal crop exceeds the coded width"))?;
        let height = crop
            .top
            .checked_add(crop.bottom)
            .and_then(|crop| crop.checked_mul(crop_unit_y))
            .and_then(|crop| coded_height.checked_sub(crop))
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "vertical crop exceeds the coded height"))?;

        Ok(Sps {
            profile_idc,
            constraint_flags,
            level_idc,
            seq_parameter_set_id,
            ext,
            pic_order_cnt_type,
            frame_mbs_only_flag,
            frame_crop_info,
            width,
            height,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
/// The high profile fields of the Sequence Parameter Set.
/// ISO/IEC-14496-10-2022 - 7.3.2.1.1
pub struct SpsExtended {
    /// The `chroma_format_idc` as a u64.
    pub chroma_format_idc: u64,       // ue(v)
    /// The `bit_depth_luma_minus8` as a u64.
    pub bit_depth_luma_minus8: u64,   // ue(v)
    /// The `bit_depth_chroma_minus8` as a u64.
    pub bit_depth_chroma_minus8: u64, // ue(v)
}

impl SpsExtended {
    /// Parses the high profile fields from a bitstream, skipping any scaling matrices.
    pub fn parse<T: io::Read>(reader: &mut BitReader<T>) -> io::Result<Self> {
        let chroma_format_idc = reader.read_exp_golomb()?;
        if chroma_format_idc == 3 {
            reader.skip_bits(1)?; // separate_colour_plane_flag
        }

        let bit_depth_luma_minus8 = reader.read_exp_golomb()?;
        let bit_depth_chroma_minus8 = reader.read_exp_golomb()?;
        reader.skip_bits(1)?; // qpprime_y_zero_transform_bypass_flag

        if reader.read_bit()? {
            // seq_scaling_matrix_present_flag
            let count = if chroma_format_idc != 3 { 8 } else { 12 };
            for i in 0..count {
                if reader.read_bit()? {
                    let size = if i < 6 { 16 } else { 64 };
                    skip_scaling_list(reader, size)?;
                }
            }
        }

        Ok(SpsExtended {
            chroma_format_idc,
            bit_depth_luma_minus8,
            bit_depth_chroma_minus8,
        })
    }
}

/// ISO/IEC-14496-10-2022 - 7.3.2.1.1.1
fn skip_scaling_list<T: io::Read>(reader: &mut BitReader<T>, size: usize) -> io::Result<()> {
    let mut last_scale = 8;
    for _ in 0..size {
        let delta_scale = reader.read_signed_exp_golomb()?;
        let next_scale = (last_scale + delta_scale).rem_euclid(256);
        if next_scale == 0 {
            // the rest of the list repeats last_scale and is not coded
            break;
        }
        last_scale = next_scale;
    }

    Ok(())
}
