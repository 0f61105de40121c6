use std::io;

use erlab_bytes_util::BitReader;

/// The fields of a sequence header OBU needed to describe a stream, up to
/// the maximum frame size.
///
/// AV1-Spec-2 - 5.5
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceHeaderObu {
    /// `seq_profile`
    pub seq_profile: u8,
    /// `still_picture`
    pub still_picture: bool,
    /// `reduced_still_picture_header`
    pub reduced_still_picture_header: bool,
    /// `timing_info()`, when `timing_info_present_flag` is set.
    pub timing_info: Option<TimingInfo>,
    /// `decoder_model_info_present_flag`
    pub decoder_model_info_present: bool,
    /// The operating points. A reduced header has a single implicit one
    /// with level 0.
    pub operating_points: Vec<OperatingPoint>,
    /// `max_frame_width_minus_1 + 1`
    pub max_frame_width: u64,
    /// `max_frame_height_minus_1 + 1`
    pub max_frame_height: u64,
}

/// `timing_info()`, AV1-Spec-2 - 5.5.3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingInfo {
    /// `num_units_in_display_tick`
    pub num_units_in_display_tick: u32,
    /// `time_scale`
    pub time_scale: u32,
}

/// One entry of the operating point loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingPoint {
    /// `operating_point_idc`
    pub idc: u16,
    /// `seq_level_idx`
    pub seq_level_idx: u8,
    /// `seq_tier`, only coded when `seq_level_idx > 7`.
    pub seq_tier: bool,
}

impl SequenceHeaderObu {
    /// Parses a sequence header OBU payload (without the OBU header).
    ///
    /// Streams with `equal_picture_interval` set are rejected with
    /// [`io::ErrorKind::Unsupported`], the `uvlc()` coded tick count that
    /// follows it is not decoded.
    pub fn parse<R: io::Read>(bit_reader: &mut BitReader<R>) -> io::Result<Self> {
        let seq_profile = bit_reader.read_bits(3)? as u8;
        let still_picture = bit_reader.read_bit()?;
        let reduced_still_picture_header = bit_reader.read_bit()?;

        let mut timing_info = None;
        let mut decoder_model_info_present = false;
        let mut operating_points = Vec::new();

        if reduced_still_picture_header {
            // The frame size bit widths follow directly, no level is read.
            operating_points.push(OperatingPoint {
                idc: 0,
                seq_level_idx: 0,
                seq_tier: false,
            });
        } else {
            let mut buffer_delay_length = 0;

            if bit_reader.read_bit()? {
                // timing_info_present_flag
                let num_units_in_display_tick = bit_reader.read_bits(32)? as u32;
                let time_scale = bit_reader.read_bits(32)? as u32;
                if bit_reader.read_bit()? {
                    // equal_picture_interval
                    return Err(io::Error::new(
                        io::ErrorKind::Unsupported,
                        "num_ticks_per_picture_minus_1 is not supported",
                    ));
                }

                timing_info = Some(TimingInfo {
                    num_units_in_display_tick,
                    time_scale,
                });

                decoder_model_info_present = bit_reader.read_bit()?;
                if decoder_model_info_present {
                    buffer_delay_length = bit_reader.read_bits(5)? as u8 + 1;
                    bit_reader.skip_bits(32)?; // num_units_in_decoding_tick
                    bit_reader.skip_bits(5)?; // buffer_removal_time_length_minus_1
                    bit_reader.skip_bits(5)?; // frame_presentation_time_length_minus_1
                }
            }

            let initial_display_delay_present = bit_reader.read_bit()?;
            let operating_points_cnt = bit_reader.read_bits(5)? as usize + 1;
            operating_points.reserve(operating_points_cnt);

            for _ in 0..operating_points_cnt {
                let idc = bit_reader.read_bits(12)? as u16;
                let seq_level_idx = bit_reader.read_bits(5)? as u8;
                let seq_tier = seq_level_idx > 7 && bit_reader.read_bit()?;

                if decoder_model_info_present && bit_reader.read_bit()? {
                    // operating_parameters_info()
                    bit_reader.skip_bits(buffer_delay_length as u64)?; // decoder_buffer_delay
                    bit_reader.skip_bits(buffer_delay_length as u64)?; // encoder_buffer_delay
                    bit_reader.skip_bits(1)?; // low_delay_mode_flag
                }

                if initial_display_delay_present && bit_reader.read_bit()? {
                    bit_reader.skip_bits(4)?; // initial_display_delay_minus_1
                }

                operating_points.push(OperatingPoint {
                    idc,
                    seq_level_idx,
                    seq_tier,
                });
            }
        }

        let frame_width_bits = bit_reader.read_bits(4)? as u8 + 1;
        let frame_height_bits = bit_reader.read_bits(4)? as u8 + 1;
        let max_frame_width = bit_reader.read_bits(frame_width_bits)? + 1;
        let max_frame_height = bit_reader.read_bits(frame_height_bits)? + 1;

        Ok(Self {
            seq_profile,
            still_picture,
            reduced_still_picture_header,
            timing_info,
            decoder_model_info_present,
            operating_points,
            max_frame_width,
            max_frame_height,
        })
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use std::io;

    use erlab_bytes_util::BitReader;

    use super::SequenceHeaderObu;

    /// Packs `(value, width)` pairs MSB first, zero padded to a byte boundary.
    fn pack(fields: &[(u64, u8)]) -> Vec<u8> {
        let mut bits = Vec::new();
        for &(value, width) in fields {
            for i in (0..width).rev() {
                bits.push((value >> i) & 1 == 1);
            }
        }

        bits.chunks(8)
            .map(|chunk| chunk.iter().enumerate().fold(0u8, |byte, (i, bit)| byte | ((*bit as u8) << (7 - i))))
            .collect()
    }

    #[test]
    fn test_parse_sequence_header() {
        let payload = [0x00, 0x00, 0x00, 0x4a, 0xab, 0xbf, 0xc3, 0x77, 0x6b, 0xe4, 0x40, 0x40, 0x40, 0x41];

        let seq = SequenceHeaderObu::parse(&mut BitReader::new_from_slice(payload)).unwrap();

        insta::assert_debug_snapshot!(seq, @r"
        SequenceHeaderObu {
            seq_profile: 0,
            still_picture: false,
            reduced_still_picture_header: false,
            timing_info: None,
            decoder_model_info_present: false,
            operating_points: [
                OperatingPoint {
                    idc: 0,
                    seq_level_idx: 9,
                    seq_tier: false,
                },
            ],
            max_frame_width: 1920,
            max_frame_height: 1080,
        }
        ");
    }

    #[test]
    fn test_parse_reduced_still_picture_header() {
        let payload = pack(&[
            (0, 3),     // seq_profile
            (1, 1),     // still_picture
            (1, 1),     // reduced_still_picture_header
            (10, 4),    // frame_width_bits_minus_1
            (10, 4),    // frame_height_bits_minus_1
            (1919, 11),
            (1079, 11),
        ]);

        let seq = SequenceHeaderObu::parse(&mut BitReader::new_from_slice(payload)).unwrap();

        assert!(seq.still_picture);
        assert!(seq.reduced_still_picture_header);
        assert_eq!(seq.timing_info, None);
        assert_eq!(seq.operating_points.len(), 1);
        assert_eq!((seq.max_frame_width, seq.max_frame_height), (1920, 1080));
    }

    #[test]
    fn test_parse_timing_and_decoder_model() {
        let payload = pack(&[
            (0, 3),      // seq_profile
            (0, 1),      // still_picture
            (0, 1),      // reduced_still_picture_header
            (1, 1),      // timing_info_present_flag
            (1001, 32),  // num_units_in_display_tick
            (60000, 32), // time_scale
            (0, 1),      // equal_picture_interval
            (1, 1),      // decoder_model_info_present_flag
            (9, 5),      // buffer_delay_length_minus_1
            (1, 32),     // num_units_in_decoding_tick
            (0, 5),      // buffer_removal_time_length_minus_1
            (0, 5),      // frame_presentation_time_length_minus_1
            (1, 1),      // initial_display_delay_present_flag
            (1, 5),      // operating_points_cnt_minus_1
            // operating point 0
            (0x101, 12),
            (12, 5),
            (1, 1),      // seq_tier
            (1, 1),      // decoder_model_present_for_this_op
            (500, 10),   // decoder_buffer_delay
            (500, 10),   // encoder_buffer_delay
            (0, 1),      // low_delay_mode_flag
            (1, 1),      // initial_display_delay_present_for_this_op
            (9, 4),      // initial_display_delay_minus_1
            // operating point 1
            (0, 12),
            (5, 5),
            (0, 1),      // decoder_model_present_for_this_op
            (0, 1),      // initial_display_delay_present_for_this_op
            (11, 4),     // frame_width_bits_minus_1
            (10, 4),     // frame_height_bits_minus_1
            (3839, 12),
            (2159, 11),
        ]);

        let seq = SequenceHeaderObu::parse(&mut BitReader::new_from_slice(payload)).unwrap();

        assert_eq!(seq.timing_info.unwrap().time_scale, 60000);
        assert!(seq.decoder_model_info_present);
        assert_eq!(seq.operating_points.len(), 2);
        assert!(seq.operating_points[0].seq_tier);
        assert_eq!(seq.operating_points[1].seq_level_idx, 5);
        assert_eq!((seq.max_frame_width, seq.max_frame_height), (3840, 2160));
    }

    #[test]
    fn test_equal_picture_interval_unsupported() {
        let payload = pack(&[
            (0, 3),
            (0, 1),
            (0, 1),
            (1, 1),  // timing_info_present_flag
            (1, 32),
            (30, 32),
            (1, 1),  // equal_picture_interval
            (0, 7),
        ]);

        let err = SequenceHeaderObu::parse(&mut BitReader::new_from_slice(payload)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }

    #[test]
    fn test_truncated_sequence_header() {
        let err = SequenceHeaderObu::parse(&mut BitReader::new_from_slice([0x00, 0x00, 0x00, 0x4a])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
