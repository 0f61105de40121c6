//! Audio tag payloads.
//!
//! Mirrors [`crate::video`]: legacy AAC sequence headers and enhanced
//! sequence starts become a [`CodecConfigurationRecord`], everything else is
//! skipped.

use std::io;

use nutype_enum::nutype_enum;

use crate::codec::{CodecConfigurationRecord, TrackKind};
use crate::error::FlvError;
use crate::reader::TrackedReader;

mod config;

nutype_enum! {
    /// FLV Sound Format
    ///
    /// Denotes the type of the underlying data packet
    ///
    /// Defined by:
    /// - Legacy FLV spec, Annex E.4.2.1
    pub enum SoundFormat(u8) {
        /// Linear PCM, platform endian
        LinearPcmPlatformEndian = 0,
        /// ADPCM
        Adpcm = 1,
        /// MP3
        Mp3 = 2,
        /// Linear PCM, little endian
        LinearPcmLittleEndian = 3,
        /// Nellymoser 16Khz Mono
        Nellymoser16KhzMono = 4,
        /// Nellymoser 8Khz Mono
        Nellymoser8KhzMono = 5,
        /// Nellymoser
        Nellymoser = 6,
        /// G.711 A-Law logarithmic PCM
        G711ALaw = 7,
        /// G.711 Mu-Law logarithmic PCM
        G711MuLaw = 8,
        /// The `ExAudioTagHeader` is present
        ///
        /// Defined by: Enhanced RTMP v2 (Enhanced Audio section)
        ExHeader = 9,
        /// AAC
        Aac = 10,
        /// Speex
        Speex = 11,
        /// Mp3 8Khz
        Mp38Khz = 14,
        /// Device specific sound
        DeviceSpecificSound = 15,
    }
}

nutype_enum! {
    /// FLV AAC Packet Type
    ///
    /// Defined by:
    /// - Legacy FLV spec, Annex E.4.2.2
    pub enum AacPacketType(u8) {
        /// Sequence Header
        SequenceHeader = 0,
        /// Raw
        Raw = 1,
    }
}

nutype_enum! {
    /// Audio packet types in enhanced audio tags.
    ///
    /// Defined by:
    /// - Enhanced RTMP spec, page 23, Enhanced Audio
    pub enum AudioPacketType(u8) {
        /// Sequence start.
        SequenceStart = 0,
        /// Coded frames.
        CodedFrames = 1,
        /// Sequence end.
        SequenceEnd = 2,
        /// Multichannel configuration.
        MultichannelConfig = 4,
        /// Turns on audio multitrack mode.
        Multitrack = 5,
        /// Modifier extension.
        ModEx = 7,
    }
}

nutype_enum! {
    /// Valid FOURCC values for signaling support of audio codecs
    /// in the enhanced FourCC pipeline.
    ///
    /// Defined by:
    /// - Enhanced RTMP spec, page 23, Enhanced Audio
    pub enum AudioFourCc([u8; 4]) {
        /// Dolby AC-3
        Ac3 = *b"ac-3",
        /// Dolby Digital Plus (E-AC-3)
        Eac3 = *b"ec-3",
        /// Opus audio
        Opus = *b"Opus",
        /// Mp3 audio
        Mp3 = *b".mp3",
        /// Free Lossless Audio Codec
        Flac = *b"fLaC",
        /// Advanced Audio Coding
        Aac = *b"mp4a",
    }
}

/// Size of the enhanced audio tag header.
const EX_AUDIO_TAG_HEADER_SIZE: usize = 5;
/// Offset of the AudioSpecificConfig in a legacy AAC sequence header.
const AAC_CONFIG_OFFSET: usize = 2;

/// Decodes the configuration record carried by an enhanced sequence start.
///
/// Unknown FourCCs produce a record with only a `size` field.
pub fn parse_sequence_start(four_cc: AudioFourCc, data: &[u8]) -> CodecConfigurationRecord {
    let mut record = CodecConfigurationRecord::new(TrackKind::Audio, String::from_utf8_lossy(&four_cc.0));

    match four_cc {
        AudioFourCc::Aac => config::aac(&mut record, data),
        AudioFourCc::Opus => config::opus(&mut record, data),
        AudioFourCc::Flac => config::flac(&mut record, data),
        _ => record.push("size", data.len()),
    }

    record
}

/// Consumes exactly `data_size` bytes of an audio tag payload, returning the
/// codec configuration record if the payload was a sequence header.
pub(crate) fn demux_sequence_header<R: io::Read>(
    reader: &mut TrackedReader<R>,
    data_size: usize,
) -> Result<Option<CodecConfigurationRecord>, FlvError> {
    if data_size < AAC_CONFIG_OFFSET {
        reader.discard(data_size as u64, "audio payload")?;
        return Ok(None);
    }

    // Legacy headers are shorter, so up to 5 bytes are read and the rest
    // reassembled when needed.
    let header_size = data_size.min(EX_AUDIO_TAG_HEADER_SIZE);
    let mut header = [0; EX_AUDIO_TAG_HEADER_SIZE];
    header[..header_size].copy_from_slice(&reader.read_bytes(header_size, "audio payload")?);
    let remaining = data_size - header_size;

    let sound_format = SoundFormat::from(header[0] >> 4);

    if sound_format == SoundFormat::ExHeader && header_size == EX_AUDIO_TAG_HEADER_SIZE {
        let packet_type = AudioPacketType::from(header[0] & 0b0000_1111);
        let four_cc = AudioFourCc::from([header[1], header[2], header[3], header[4]]);

        if packet_type == AudioPacketType::SequenceStart {
            let data = reader.read_bytes(remaining, "audio payload")?;
            tracing::debug!(?four_cc, size = data.len(), "audio sequence start");

            return Ok(Some(parse_sequence_start(four_cc, &data)));
        }
    } else if sound_format == SoundFormat::Aac && AacPacketType::from(header[1]) == AacPacketType::SequenceHeader {
        let rest = reader.read_bytes(remaining, "audio payload")?;

        let mut data = Vec::with_capacity(data_size - AAC_CONFIG_OFFSET);
        data.extend_from_slice(&header[AAC_CONFIG_OFFSET..header_size]);
        data.extend_from_slice(&rest);
        tracing::debug!(size = data.len(), "aac sequence header");

        let mut record = CodecConfigurationRecord::new(TrackKind::Audio, "mp4a");
        config::aac(&mut record, &data);
        return Ok(Some(record));
    }

    reader.discard(remaining as u64, "audio payload")?;
    Ok(None)
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;
    use crate::codec::FieldValue;

    fn demux(payload: &[u8]) -> (Option<CodecConfigurationRecord>, u64) {
        let mut reader = TrackedReader::new(payload);
        let record = demux_sequence_header(&mut reader, payload.len()).unwrap();
        (record, reader.position())
    }

    #[test]
    fn legacy_aac_sequence_header() {
        // AAC, 44 kHz, 16 bit, stereo; sequence header; LC 48 kHz mono
        let payload = [0xAF, 0x00, 0x11, 0x88];

        let (record, consumed) = demux(&payload);
        let record = record.unwrap();

        assert_eq!(consumed, 4);
        insta::assert_debug_snapshot!(record, @r#"
        CodecConfigurationRecord {
            track: Audio,
            codec: "mp4a",
            fields: [
                ConfigField {
                    name: "audioObjectType",
                    value: Int(
                        2,
                    ),
                },
                ConfigField {
                    name: "samplingFrequency",
                    value: Int(
                        48000,
                    ),
                },
                ConfigField {
                    name: "channelConfiguration",
                    value: Int(
                        1,
                    ),
                },
            ],
        }
        "#);
    }

    #[test]
    fn legacy_aac_reassembles_long_config() {
        // the config continues past the pre-read 5 bytes
        let payload = [0xAF, 0x00, 0x12, 0x10, 0x56, 0xE5, 0x00];

        let (record, consumed) = demux(&payload);
        let record = record.unwrap();
        assert_eq!(consumed, 7);
        assert_eq!(record.field("samplingFrequency"), Some(&FieldValue::Int(44100)));
        assert_eq!(record.field("channelConfiguration"), Some(&FieldValue::Int(2)));
    }

    #[test]
    fn legacy_aac_without_config() {
        let (record, consumed) = demux(&[0xAF, 0x00]);
        assert_eq!(consumed, 2);
        assert_eq!(
            record.unwrap().field("error"),
            Some(&FieldValue::Str("truncated".into()))
        );
    }

    #[test]
    fn enhanced_sequence_starts() {
        let (record, _) = demux(&[0x90, b'm', b'p', b'4', b'a', 0x12, 0x10]);
        let record = record.unwrap();
        assert_eq!(record.codec, "mp4a");
        assert_eq!(record.field("audioObjectType"), Some(&FieldValue::Int(2)));

        let (record, consumed) = demux(&[0x90, b'a', b'c', b'-', b'3', 0x01, 0x02]);
        let record = record.unwrap();
        assert_eq!(consumed, 7);
        assert_eq!(record.codec, "ac-3");
        assert_eq!(record.field("size"), Some(&FieldValue::Int(2)));

        let (record, _) = demux(&[0x90, b'O', b'p', b'u', b's']);
        let record = record.unwrap();
        assert_eq!(record.codec, "Opus");
        assert_eq!(record.field("size"), Some(&FieldValue::Int(0)));
    }

    #[test]
    fn non_sequence_payloads_are_skipped() {
        for payload in [
            // enhanced coded frames
            &[0x91, b'O', b'p', b'u', b's', 0xFC, 0xFF][..],
            // enhanced header cut short
            &[0x90, b'O', b'p', b'u'][..],
            // raw aac
            &[0xAF, 0x01, 0x21, 0x00, 0x49, 0x90][..],
            // mp3
            &[0x2F, 0xFF, 0xFB, 0x90][..],
            &[0xAF][..],
            &[][..],
        ] {
            let (record, consumed) = demux(payload);
            assert_eq!(record, None);
            assert_eq!(consumed, payload.len() as u64);
        }
    }
}
