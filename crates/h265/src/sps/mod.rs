use std::io;

use byteorder::{BigEndian, ReadBytesExt};
use erlab_bytes_util::BitReader;
use erlab_expgolomb::BitReaderExpGolombExt;
use erlab_h264::EmulationPreventionIo;

mod conformance_window;
mod profile_tier_level;

pub use conformance_window::ConformanceWindow;
use profile_tier_level::ProfileTierLevel;

/// NAL unit type of a sequence parameter set.
const SPS_NUT: u16 = 33;

/// The leading fields of an H.265 Sequence Parameter Set.
/// ISO/IEC-23008-2-2020 - 7.3.2.2
#[derive(Debug, Clone, PartialEq)]
pub struct Sps {
    /// `sps_video_parameter_set_id`
    pub sps_video_parameter_set_id: u8,
    /// `sps_max_sub_layers_minus1`, in the range \[0, 6\].
    pub sps_max_sub_layers_minus1: u8,
    /// `sps_temporal_id_nesting_flag`
    pub sps_temporal_id_nesting_flag: bool,
    /// `sps_seq_parameter_set_id`
    pub sps_seq_parameter_set_id: u64,
    /// `chroma_format_idc`
    pub chroma_format_idc: u64,
    /// `separate_colour_plane_flag`, only coded when `chroma_format_idc == 3`.
    pub separate_colour_plane_flag: bool,
    /// `pic_width_in_luma_samples`
    pub pic_width_in_luma_samples: u64,
    /// `pic_height_in_luma_samples`
    pub pic_height_in_luma_samples: u64,
    /// The conformance cropping window, if `conformance_window_flag` was set.
    pub conformance_window: Option<ConformanceWindow>,
    /// The displayed width after applying the conformance window.
    pub width: u64,
    /// The displayed height after applying the conformance window.
    pub height: u64,
}

impl Sps {
    /// Parses an SPS NAL unit (including its 2-byte header) from a reader
    /// that still contains emulation prevention bytes.
    pub fn parse_with_emulation_prevention(mut reader: impl io::Read) -> io::Result<Self> {
        let nal_header = reader.read_u16::<BigEndian>()?;
        if nal_header & 0x8000 != 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "forbidden_zero_bit is not zero"));
        }

        let nal_unit_type = (nal_header >> 9) & 0b11_1111;
        if nal_unit_type != SPS_NUT {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("nal unit type is not SPS: {nal_unit_type}"),
            ));
        }

        Self::parse_rbsp(BitReader::new(EmulationPreventionIo::new(reader)))
    }

    fn parse_rbsp<R: io::Read>(mut bit_reader: BitReader<R>) -> io::Result<Self> {
        let sps_video_parameter_set_id = bit_reader.read_bits(4)? as u8;
        let sps_max_sub_layers_minus1 = bit_reader.read_bits(3)? as u8;
        let sps_temporal_id_nesting_flag = bit_reader.read_bit()?;

        ProfileTierLevel::skip(&mut bit_reader, true, sps_max_sub_layers_minus1)?;

        let sps_seq_parameter_set_id = bit_reader.read_exp_golomb()?;
        let chroma_format_idc = bit_reader.read_exp_golomb()?;
        let separate_colour_plane_flag = if chroma_format_idc == 3 {
            bit_reader.read_bit()?
        } else {
            false
        };

        let pic_width_in_luma_samples = bit_reader.read_exp_golomb()?;
        let pic_height_in_luma_samples = bit_reader.read_exp_golomb()?;

        let conformance_window = if bit_reader.read_bit()? {
            Some(ConformanceWindow::parse(&mut bit_reader)?)
        } else {
            None
        };

        // Table 6-1, SubWidthC and SubHeightC
        let (sub_width_c, sub_height_c) = match chroma_format_idc {
            1 => (2, 2),
            2 => (2, 1),
            _ => (1, 1),
        };

        let (width, height) = match &conformance_window {
            Some(window) => window.crop(
                pic_width_in_luma_samples,
                pic_height_in_luma_samples,
                sub_width_c,
                sub_height_c,
            )?,
            None => (pic_width_in_luma_samples, pic_height_in_luma_samples),
        };

        Ok(Sps {
            sps_video_parameter_set_id,
            sps_max_sub_layers_minus1,
            sps_temporal_id_nesting_flag,
            sps_seq_parameter_set_id,
            chroma_format_idc,
            separate_colour_plane_flag,
            pic_width_in_luma_samples,
            pic_height_in_luma_samples,
            conformance_window,
            width,
            height,
        })
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use std::io;

    use crate::{ConformanceWindow, Sps};

    #[test]
    fn test_sps_parse() {
        let data = b"B\x01\x01\x01@\0\0\x03\0\x90\0\0\x03\0\0\x03\0\x99\xa0\x01@ \x05\xa1e\x95R\x90\x84d_\xf8\xc0Z\x80\x80\x80\x82\0\0\x03\0\x02\0\0\x03\x01 \xc0\x0b\xbc\xa2\0\x02bX\0\x011-\x08";

        let sps = Sps::parse_with_emulation_prevention(io::Cursor::new(data)).unwrap();

        insta::assert_debug_snapshot!(sps, @r"
        Sps {
            sps_video_parameter_set_id: 0,
            sps_max_sub_layers_minus1: 0,
            sps_temporal_id_nesting_flag: true,
            sps_seq_parameter_set_id: 0,
            chroma_format_idc: 1,
            separate_colour_plane_flag: false,
            pic_width_in_luma_samples: 2560,
            pic_height_in_luma_samples: 1440,
            conformance_window: None,
            width: 2560,
            height: 1440,
        }
        ");
    }

    #[test]
    fn test_sub_layer_profile_and_level_present() {
        #[rustfmt::skip]
        let data = b"\x42\x00\
            \x03\
            \x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
            \xC0\
            \x00\
            \x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
            \xC0\x16\x88\x07\xC5\xDF\x84\x00";

        let sps = Sps::parse_with_emulation_prevention(io::Cursor::new(data)).unwrap();

        assert_eq!(sps.sps_max_sub_layers_minus1, 1);
        assert_eq!(sps.chroma_format_idc, 0);
        assert_eq!(sps.width, 720);
        assert_eq!(sps.height, 496);
    }

    #[test]
    fn test_sub_layer_profile_without_level() {
        #[rustfmt::skip]
        let data = b"\x42\x00\
            \x03\
            \x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
            \x80\
            \x00\
            \x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
            \xC0\x0F\x02\x00\x43\x97\x7E\x10";

        let sps = Sps::parse_with_emulation_prevention(io::Cursor::new(data)).unwrap();

        assert_eq!(sps.sps_max_sub_layers_minus1, 1);
        assert_eq!(sps.width, 1920);
        assert_eq!(sps.height, 1080);
    }

    #[test]
    fn test_chroma_format_idc_3() {
        #[rustfmt::skip]
        let data = b"\x42\x00\
            \x03\
            \x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
            \x40\
            \x00\
            \x00\
            \x90\x00\xA0\x40\x2D\x2E\xFC\x20";

        let sps = Sps::parse_with_emulation_prevention(io::Cursor::new(data)).unwrap();

        assert_eq!(sps.chroma_format_idc, 3);
        assert!(!sps.separate_colour_plane_flag);
        assert_eq!(sps.width, 640);
        assert_eq!(sps.height, 360);
    }

    #[test]
    fn test_conformance_window_and_chroma_format_idc_2() {
        #[rustfmt::skip]
        let data = b"\x42\x00\
            \x03\
            \x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
            \x40\
            \x00\
            \x00\
            \xB0\x0A\x48\x0F\x5B\x6D\xF7\xF1\x20";

        let sps = Sps::parse_with_emulation_prevention(io::Cursor::new(data)).unwrap();

        assert_eq!(sps.chroma_format_idc, 2);
        assert_eq!(sps.pic_width_in_luma_samples, 328);
        assert_eq!(sps.pic_height_in_luma_samples, 244);
        assert_eq!(
            sps.conformance_window,
            Some(ConformanceWindow {
                conf_win_left_offset: 2,
                conf_win_right_offset: 2,
                conf_win_top_offset: 2,
                conf_win_bottom_offset: 2,
            })
        );
        assert_eq!(sps.width, 320);
        assert_eq!(sps.height, 240);
    }

    #[test]
    fn test_not_sps() {
        // VPS header
        let err = Sps::parse_with_emulation_prevention(io::Cursor::new(b"\x40\x01\x0c\x01")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_truncated_sps() {
        let err = Sps::parse_with_emulation_prevention(io::Cursor::new(b"\x42\x01\x01\x01@\0\0")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
