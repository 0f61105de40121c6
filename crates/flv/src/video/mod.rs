//! Video tag payloads.
//!
//! Only the 5 byte tag header is interpreted. Sequence headers (legacy AVC
//! sequence headers and enhanced sequence starts) are turned into a
//! [`CodecConfigurationRecord`], every other payload is skipped.

use std::io;

use bytes::Bytes;
use nutype_enum::nutype_enum;

use crate::codec::{CodecConfigurationRecord, TrackKind};
use crate::error::FlvError;
use crate::reader::TrackedReader;

mod config;

nutype_enum! {
    /// FLV Video Codec ID
    ///
    /// Denotes the different types of video codecs in legacy video tags.
    ///
    /// Defined by:
    /// - Legacy FLV spec, Annex E.4.3.1
    pub enum VideoCodecId(u8) {
        /// Sorenson H.263
        SorensonH263 = 2,
        /// Screen Video
        ScreenVideo = 3,
        /// On2 VP6
        On2VP6 = 4,
        /// On2 VP6 with alpha channel
        On2VP6WithAlphaChannel = 5,
        /// Screen Video Version 2
        ScreenVideoVersion2 = 6,
        /// AVC (H.264)
        Avc = 7,
    }
}

nutype_enum! {
    /// FLV AVC Packet Type
    ///
    /// Defined by:
    /// - Legacy FLV spec, Annex E.4.3.1
    pub enum AvcPacketType(u8) {
        /// AVC sequence header
        SeqHdr = 0,
        /// AVC NALU
        Nalu = 1,
        /// AVC end of sequence (lower level NALU sequence ender is not required or supported)
        EndOfSequence = 2,
    }
}

nutype_enum! {
    /// Different types of video packets.
    ///
    /// Defined by:
    /// - Enhanced RTMP spec, page 27-28, Enhanced Video
    pub enum VideoPacketType(u8) {
        /// Sequence start.
        SequenceStart = 0,
        /// Coded frames.
        CodedFrames = 1,
        /// Sequence end.
        SequenceEnd = 2,
        /// Coded frames without extra data.
        CodedFramesX = 3,
        /// Metadata.
        Metadata = 4,
        /// MPEG-2 TS sequence start.
        Mpeg2TsSequenceStart = 5,
        /// Turns on video multitrack mode.
        Multitrack = 6,
        /// Modifier extension.
        ModEx = 7,
    }
}

nutype_enum! {
    /// Valid FOURCC values for signaling support of video codecs
    /// in the enhanced FourCC pipeline.
    ///
    /// Defined by:
    /// - Enhanced RTMP spec, page 28, Enhanced Video
    pub enum VideoFourCc([u8; 4]) {
        /// VP8
        Vp8 = *b"vp08",
        /// VP9
        Vp9 = *b"vp09",
        /// AV1
        Av1 = *b"av01",
        /// AVC (H.264)
        Avc = *b"avc1",
        /// HEVC (H.265)
        Hevc = *b"hvc1",
    }
}

/// Size of both the legacy and the enhanced video tag header.
const VIDEO_TAG_HEADER_SIZE: usize = 5;

/// Decodes the configuration record carried by an enhanced sequence start.
///
/// Unknown FourCCs produce a record with only a `size` field.
pub fn parse_sequence_start(four_cc: VideoFourCc, data: Bytes) -> CodecConfigurationRecord {
    let mut record = CodecConfigurationRecord::new(TrackKind::Video, String::from_utf8_lossy(&four_cc.0));

    match four_cc {
        VideoFourCc::Avc => config::avc(&mut record, data),
        VideoFourCc::Hevc => config::hevc(&mut record, data),
        VideoFourCc::Av1 => config::av1(&mut record, data),
        VideoFourCc::Vp9 => config::vp9(&mut record, data),
        _ => record.push("size", data.len()),
    }

    record
}

/// Consumes exactly `data_size` bytes of a video tag payload, returning the
/// codec configuration record if the payload was a sequence header.
pub(crate) fn demux_sequence_header<R: io::Read>(
    reader: &mut TrackedReader<R>,
    data_size: usize,
) -> Result<Option<CodecConfigurationRecord>, FlvError> {
    if data_size < VIDEO_TAG_HEADER_SIZE {
        reader.discard(data_size as u64, "video payload")?;
        return Ok(None);
    }

    let header: [u8; VIDEO_TAG_HEADER_SIZE] = reader.read_array("video payload")?;
    let remaining = data_size - VIDEO_TAG_HEADER_SIZE;

    // The upper bit of the frame type signals an enhanced header.
    if header[0] & 0b1000_0000 != 0 {
        let packet_type = VideoPacketType::from(header[0] & 0b0000_1111);
        let four_cc = VideoFourCc::from([header[1], header[2], header[3], header[4]]);

        if packet_type != VideoPacketType::SequenceStart {
            reader.discard(remaining as u64, "video payload")?;
            return Ok(None);
        }

        let data = reader.read_bytes(remaining, "video payload")?;
        tracing::debug!(?four_cc, size = data.len(), "video sequence start");

        return Ok(Some(parse_sequence_start(four_cc, data)));
    }

    let codec_id = VideoCodecId::from(header[0] & 0b0000_1111);
    // header[2..5] is the composition time offset
    if codec_id == VideoCodecId::Avc && AvcPacketType::from(header[1]) == AvcPacketType::SeqHdr {
        let data = reader.read_bytes(remaining, "video payload")?;
        tracing::debug!(size = data.len(), "avc sequence header");

        let mut record = CodecConfigurationRecord::new(TrackKind::Video, "avc1");
        config::avc(&mut record, data);
        return Ok(Some(record));
    }

    reader.discard(remaining as u64, "video payload")?;
    Ok(None)
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;
    use crate::codec::FieldValue;

    #[rustfmt::skip]
    const SPS_1080P: [u8; 29] = [
        103, 100, 0, 42, 172, 178, 0, 240, 4, 79, 203, 128, 181, 1, 1, 1, 64, 0, 0, 3, 0, 64, 0, 0, 30, 35, 198, 12, 146,
    ];

    fn avc_record() -> Vec<u8> {
        #[rustfmt::skip]
        let mut data = vec![
            0x01, // configurationVersion
            0x64, // AVCProfileIndication 100
            0x00, // profile_compatibility
            0x2A, // AVCLevelIndication 42
            0xFF, // lengthSizeMinusOne 3
            0xE1, // one SPS
            0x00, 0x1D, // SPS length 29
        ];
        data.extend_from_slice(&SPS_1080P);
        data.extend_from_slice(&[0x01, 0x00, 0x04, 0x68, 0xEB, 0xE3, 0xCB]); // one PPS
        data
    }

    fn demux(payload: &[u8]) -> (Option<CodecConfigurationRecord>, u64) {
        let mut reader = TrackedReader::new(payload);
        let record = demux_sequence_header(&mut reader, payload.len()).unwrap();
        (record, reader.position())
    }

    #[test]
    fn legacy_avc_sequence_header() {
        let mut payload = vec![0x17, 0x00, 0x00, 0x00, 0x00];
        payload.extend_from_slice(&avc_record());

        let (record, consumed) = demux(&payload);
        let record = record.unwrap();

        assert_eq!(consumed, payload.len() as u64);
        assert_eq!(record.track, TrackKind::Video);
        assert_eq!(record.codec, "avc1");
        assert_eq!(record.field("AVCProfileIndication"), Some(&FieldValue::Int(100)));
        assert_eq!(record.field("AVCLevelIndication"), Some(&FieldValue::Int(42)));
        assert_eq!(record.field("profile_compatibility"), Some(&FieldValue::Str("0x00".into())));
        assert_eq!(record.field("numOfSPS"), Some(&FieldValue::Int(1)));
        assert_eq!(record.field("width"), Some(&FieldValue::Int(1920)));
        assert_eq!(record.field("height"), Some(&FieldValue::Int(1080)));
        assert_eq!(record.fields.last().map(|f| f.name), Some("height"));
    }

    #[test]
    fn enhanced_avc_sequence_start() {
        let mut payload = vec![0x90, b'a', b'v', b'c', b'1'];
        payload.extend_from_slice(&avc_record());

        let (record, _) = demux(&payload);
        let record = record.unwrap();
        assert_eq!(record.codec, "avc1");
        assert_eq!(record.field("width"), Some(&FieldValue::Int(1920)));
    }

    #[test]
    fn enhanced_av1_sequence_start() {
        #[rustfmt::skip]
        let payload = [
            0x90, b'a', b'v', b'0', b'1', // key frame, sequence start
            0x81, 0x09, 0x0C, 0x00, // av1C
            0x0A, 0x0E, 0x00, 0x00, 0x00, 0x4A, 0xAB, 0xBF, 0xC3, 0x77, 0x6B, 0xE4, 0x40, 0x40, 0x40, 0x41,
        ];

        let (record, consumed) = demux(&payload);
        let record = record.unwrap();

        assert_eq!(consumed, payload.len() as u64);
        assert_eq!(record.codec, "av01");
        assert_eq!(record.field("seq_level_idx_0"), Some(&FieldValue::Int(9)));
        assert_eq!(record.field("bit_depth"), Some(&FieldValue::Int(8)));
        assert_eq!(record.field("initial_presentation_delay_present"), Some(&FieldValue::Int(0)));
        assert_eq!(record.field("initial_presentation_delay_minus_one"), None);
        assert_eq!(record.field("config_obus_size"), Some(&FieldValue::Int(16)));
        assert_eq!(record.field("max_frame_width"), Some(&FieldValue::Int(1920)));
        assert_eq!(record.field("max_frame_height"), Some(&FieldValue::Int(1080)));
    }

    #[test]
    fn unknown_four_cc_reports_size() {
        let payload = [0x90, b'v', b'p', b'0', b'8', 0xAA, 0xBB, 0xCC];

        let (record, _) = demux(&payload);
        let record = record.unwrap();
        assert_eq!(record.codec, "vp08");
        assert_eq!(record.fields.len(), 1);
        assert_eq!(record.field("size"), Some(&FieldValue::Int(3)));
    }

    #[test]
    fn non_sequence_payloads_are_skipped() {
        for payload in [
            // enhanced coded frames
            &[0x91, b'h', b'v', b'c', b'1', 0x00, 0x00, 0x00, 0x01][..],
            // legacy avc nalu
            &[0x27, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01][..],
            // legacy vp6 frame
            &[0x14, 0x00, 0x00, 0x00, 0x00, 0x00][..],
            // too short for a header
            &[0x17, 0x00, 0x00, 0x00][..],
            &[][..],
        ] {
            let (record, consumed) = demux(payload);
            assert_eq!(record, None);
            assert_eq!(consumed, payload.len() as u64);
        }
    }

    #[test]
    fn truncated_payload() {
        let payload = [0x90, b'a', b'v', b'0', b'1', 0x81];
        let mut reader = TrackedReader::new(&payload[..]);
        let err = demux_sequence_header(&mut reader, 20).unwrap_err();
        assert!(matches!(err, FlvError::Truncated { context: "video payload", offset: 5 }));
    }
}
