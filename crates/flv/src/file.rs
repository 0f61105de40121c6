//! FLV file processing

use std::io;

use erlab_amf0::Amf0Object;
use serde_derive::Serialize;

use crate::codec::CodecConfigurationRecord;
use crate::error::FlvError;
use crate::header::FlvHeader;
use crate::reader::TrackedReader;
use crate::tag::{FlvTagHeader, FlvTagType, TagCounts, TagInfo};
use crate::{audio, script, video};

/// Everything learned from one pass over an FLV file.
///
/// An FLV file is a [`FlvHeader`] followed by the FLV File Body, a series of
/// tags each followed by the size of the tag before it.
///
/// The FLV File Body is defined by:
/// - Legacy FLV spec, Annex E.3
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlvReport {
    /// The header of the FLV file.
    pub header: FlvHeader,
    /// Tag counts per type.
    pub tag_counts: TagCounts,
    /// One entry per tag, in file order. Only filled by
    /// [`FlvReport::inspect_with_index`].
    pub tags: Vec<TagInfo>,
    /// Properties of every decodable `onMetaData` script tag, in file order.
    pub metadata: Vec<Amf0Object>,
    /// Codec configuration records from audio and video sequence headers, in file order.
    pub codec_configs: Vec<CodecConfigurationRecord>,
}

impl FlvReport {
    /// Walks an FLV stream from its first byte.
    ///
    /// The stream is read strictly forward and every tag payload is consumed
    /// exactly. The walk ends cleanly only when the stream ends on a tag
    /// boundary; ending anywhere else is [`FlvError::Truncated`].
    ///
    /// The per-tag index is not kept, so memory use does not grow with the
    /// number of tags.
    pub fn inspect<R: io::Read>(reader: R) -> Result<Self, FlvError> {
        Self::walk(reader, false)
    }

    /// Like [`FlvReport::inspect`], but also records a [`TagInfo`] for every
    /// tag in [`FlvReport::tags`].
    pub fn inspect_with_index<R: io::Read>(reader: R) -> Result<Self, FlvError> {
        Self::walk(reader, true)
    }

    fn walk<R: io::Read>(reader: R, index: bool) -> Result<Self, FlvError> {
        let mut reader = TrackedReader::new(reader);
        let header = FlvHeader::demux(&mut reader)?;

        let mut report = FlvReport {
            header,
            tag_counts: TagCounts::default(),
            tags: Vec::new(),
            metadata: Vec::new(),
            codec_configs: Vec::new(),
        };

        // We don't care about the previous tag size, its only really used for seeking
        // backwards.
        if reader.try_read_array::<4>("previous tag size")?.is_none() {
            return Ok(report);
        }

        loop {
            let offset = reader.position();
            let Some(bytes) = reader.try_read_array("tag header")? else {
                break;
            };

            let tag = FlvTagHeader::parse(&bytes);
            let data_size = tag.data_size as usize;
            tracing::trace!(
                offset,
                tag_type = ?tag.tag_type,
                data_size,
                timestamp_ms = tag.timestamp_ms,
                "tag"
            );

            report.tag_counts.record(tag.tag_type);
            if index {
                report.tags.push(TagInfo::new(offset, &tag));
            }

            match tag.tag_type {
                FlvTagType::Video => {
                    if let Some(record) = video::demux_sequence_header(&mut reader, data_size)? {
                        report.codec_configs.push(record);
                    }
                }
                FlvTagType::Audio => {
                    if let Some(record) = audio::demux_sequence_header(&mut reader, data_size)? {
                        report.codec_configs.push(record);
                    }
                }
                FlvTagType::ScriptData => {
                    let payload = reader.read_bytes(data_size, "script payload")?;
                    if let Some(metadata) = script::on_meta_data(&payload)? {
                        report.metadata.push(metadata);
                    }
                }
                _ => reader.discard(data_size as u64, "tag payload")?,
            }

            reader.read_array::<4>("previous tag size")?;
        }

        Ok(report)
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use std::io;

    use erlab_amf0::{Amf0Encoder, Amf0Value};

    use super::*;
    use crate::codec::{FieldValue, TrackKind};

    const HEADER: [u8; 13] = [b'F', b'L', b'V', 0x01, 0x05, 0x00, 0x00, 0x00, 0x09, 0x00, 0x00, 0x00, 0x00];

    fn push_tag(buf: &mut Vec<u8>, tag_type: u8, timestamp: u32, payload: &[u8]) {
        let size = (payload.len() as u32).to_be_bytes();
        let ts = timestamp.to_be_bytes();
        buf.extend_from_slice(&[tag_type, size[1], size[2], size[3], ts[1], ts[2], ts[3], ts[0], 0, 0, 0]);
        buf.extend_from_slice(payload);
        buf.extend_from_slice(&(payload.len() as u32 + 11).to_be_bytes());
    }

    fn metadata_payload() -> Vec<u8> {
        let mut object = Amf0Object::new();
        object.push("duration", 2.0);
        object.push("width", 1920.0);
        object.push("height", 1080.0);

        let mut encoder = Amf0Encoder::new(Vec::new());
        encoder.encode_string("onMetaData").unwrap();
        encoder.encode_ecma_array(&object).unwrap();
        encoder.into_inner()
    }

    #[rustfmt::skip]
    const AV1_SEQUENCE_START: [u8; 25] = [
        0x90, b'a', b'v', b'0', b'1',
        0x81, 0x09, 0x0C, 0x00,
        0x0A, 0x0E, 0x00, 0x00, 0x00, 0x4A, 0xAB, 0xBF, 0xC3, 0x77, 0x6B, 0xE4, 0x40, 0x40, 0x40, 0x41,
    ];

    #[test]
    fn header_then_eof() {
        let report = FlvReport::inspect(&HEADER[..]).unwrap();
        assert_eq!(report.tag_counts, TagCounts::default());
        assert!(report.tags.is_empty());

        // missing the first previous tag size entirely
        let report = FlvReport::inspect(&HEADER[..9]).unwrap();
        assert_eq!(report.tag_counts.total, 0);
    }

    #[test]
    fn bad_header() {
        let err = FlvReport::inspect(&b"FLV\x01\x05\x00\x00"[..]).unwrap_err();
        assert!(matches!(err, FlvError::Truncated { context: "header", offset: 0 }));

        let err = FlvReport::inspect(&b"MP4\x01\x05\x00\x00\x00\x09"[..]).unwrap_err();
        assert!(matches!(err, FlvError::InvalidSignature(_)));

        let err = FlvReport::inspect(&HEADER[..11]).unwrap_err();
        assert!(matches!(
            err,
            FlvError::Truncated {
                context: "previous tag size",
                offset: 9
            }
        ));
    }

    #[test]
    fn walk_mixed_stream() {
        let mut buf = HEADER.to_vec();
        push_tag(&mut buf, 18, 0, &metadata_payload());
        push_tag(&mut buf, 9, 0, &AV1_SEQUENCE_START);
        push_tag(&mut buf, 8, 0, &[0xAF, 0x00, 0x12, 0x10]);
        push_tag(&mut buf, 9, 33, &[0x91, b'a', b'v', b'0', b'1', 0x12, 0x00, 0x0A]);
        push_tag(&mut buf, 8, 23, &[0xAF, 0x01, 0x21, 0x00]);
        push_tag(&mut buf, 15, 40, &[0xDE, 0xAD]);
        push_tag(&mut buf, 18, 0x0100_0000, &[0x02, 0x00, 0x02, b'h', b'i', 0x05]);

        let report = FlvReport::inspect_with_index(io::Cursor::new(&buf)).unwrap();

        insta::assert_debug_snapshot!(report.tag_counts, @r"
        TagCounts {
            total: 7,
            audio: 2,
            video: 2,
            script: 2,
            other: 1,
        }
        ");

        let counts = report.tag_counts;
        assert_eq!(counts.audio + counts.video + counts.script + counts.other, counts.total);
        assert_eq!(report.tags.len(), 7);
        assert_eq!(report.tags[0].offset, 13);
        assert_eq!(report.tags[6].timestamp_ms, 0x0100_0000);
        assert_eq!(report.tags[5].tag_type, FlvTagType(15));

        assert_eq!(report.metadata.len(), 1);
        assert_eq!(report.metadata[0].get("width"), Some(&Amf0Value::Number(1920.0)));

        assert_eq!(report.codec_configs.len(), 2);
        let video = &report.codec_configs[0];
        assert_eq!((video.track, video.codec.as_str()), (TrackKind::Video, "av01"));
        assert_eq!(video.field("max_frame_width"), Some(&FieldValue::Int(1920)));
        assert_eq!(video.field("max_frame_height"), Some(&FieldValue::Int(1080)));
        let audio = &report.codec_configs[1];
        assert_eq!((audio.track, audio.codec.as_str()), (TrackKind::Audio, "mp4a"));
        assert_eq!(audio.field("samplingFrequency"), Some(&FieldValue::Int(44100)));

        let without_index = FlvReport::inspect(io::Cursor::new(&buf)).unwrap();
        assert!(without_index.tags.is_empty());
        assert_eq!(without_index.tag_counts, counts);
        assert_eq!(without_index.codec_configs, report.codec_configs);
    }

    #[test]
    fn truncated_payload() {
        let mut buf = HEADER.to_vec();
        // declares 100 bytes of payload, carries 50
        buf.extend_from_slice(&[0x0F, 0x00, 0x00, 0x64, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        buf.extend_from_slice(&[0; 50]);

        let err = FlvReport::inspect(&buf[..]).unwrap_err();
        assert!(matches!(err, FlvError::Truncated { context: "tag payload", offset: 24 }));

        for tag_type in [8, 9, 18] {
            buf[13] = tag_type;
            let err = FlvReport::inspect(&buf[..]).unwrap_err();
            assert!(matches!(err, FlvError::Truncated { .. }), "{tag_type}: {err}");
        }
    }

    #[test]
    fn truncated_header_and_trailer() {
        let mut buf = HEADER.to_vec();
        push_tag(&mut buf, 8, 0, &[0xAF, 0x01]);

        // cut inside the trailer
        let err = FlvReport::inspect(&buf[..buf.len() - 1]).unwrap_err();
        assert!(matches!(err, FlvError::Truncated { context: "previous tag size", offset: 26 }));

        // cut inside the next tag header
        buf.extend_from_slice(&[0x08, 0x00]);
        let err = FlvReport::inspect(&buf[..]).unwrap_err();
        assert!(matches!(err, FlvError::Truncated { context: "tag header", offset: 30 }));
    }

    #[test]
    fn undecodable_script_is_fatal() {
        let mut buf = HEADER.to_vec();
        push_tag(&mut buf, 18, 0, &[0x42]);

        let err = FlvReport::inspect(&buf[..]).unwrap_err();
        assert!(matches!(err, FlvError::Amf0(_)));
    }

    #[test]
    fn report_serializes() {
        let mut buf = HEADER.to_vec();
        push_tag(&mut buf, 8, 0, &[0xAF, 0x00, 0x12, 0x10]);

        let report = FlvReport::inspect_with_index(&buf[..]).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["header"]["data_offset"], 9);
        assert_eq!(json["tag_counts"]["audio"], 1);
        assert_eq!(json["tags"][0]["tag_type"], "audio");
        assert_eq!(json["codec_configs"][0]["track"], "audio");
        assert_eq!(json["codec_configs"][0]["fields"]["channelConfiguration"], 2);
    }
}
