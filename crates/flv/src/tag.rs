//! FLV tag headers and per-tag bookkeeping.

use byteorder::{BigEndian, ByteOrder};
use nutype_enum::nutype_enum;
use serde_derive::Serialize;

nutype_enum! {
    /// FLV Tag Type
    ///
    /// This is the type of the tag, taken from the low 5 bits of the first
    /// tag header byte.
    ///
    /// Defined by:
    /// - Legacy FLV spec, Annex E.4.1
    ///
    /// The 3 types that are supported are:
    /// - Audio(8)
    /// - Video(9)
    /// - ScriptData(18)
    pub enum FlvTagType(u8) {
        /// [`crate::audio`]
        Audio = 8,
        /// [`crate::video`]
        Video = 9,
        /// [`crate::script`]
        ScriptData = 18,
    }
}

impl serde::Serialize for FlvTagType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match *self {
            FlvTagType::Audio => serializer.serialize_str("audio"),
            FlvTagType::Video => serializer.serialize_str("video"),
            FlvTagType::ScriptData => serializer.serialize_str("script"),
            FlvTagType(other) => serializer.serialize_u8(other),
        }
    }
}

/// The 11 byte header in front of every tag payload.
///
/// Defined by:
/// - Legacy FLV spec, Annex E.4.1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlvTagHeader {
    /// Whether the payload is marked as filtered (encrypted).
    pub filter: bool,
    /// The type of the payload.
    pub tag_type: FlvTagType,
    /// Payload size in bytes, not counting this header or the trailer.
    pub data_size: u32,
    /// Timestamp in milliseconds, the extended byte being the upper 8 bits.
    pub timestamp_ms: u32,
    /// Stream id, always 0 in files.
    pub stream_id: u32,
}

impl FlvTagHeader {
    /// Size of the header.
    pub const SIZE: usize = 11;

    /// Parses a tag header.
    pub fn parse(bytes: &[u8; Self::SIZE]) -> Self {
        let data_size = BigEndian::read_u24(&bytes[1..4]);
        // The extended timestamp byte holds the upper 8 bits.
        let timestamp_ms = BigEndian::read_u24(&bytes[4..7]) | ((bytes[7] as u32) << 24);
        let stream_id = BigEndian::read_u24(&bytes[8..11]);

        Self {
            filter: (bytes[0] & 0b0010_0000) != 0,
            tag_type: FlvTagType(bytes[0] & 0b0001_1111),
            data_size,
            timestamp_ms,
            stream_id,
        }
    }
}

/// Number of tags seen per type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TagCounts {
    /// All tags.
    pub total: u64,
    /// Audio tags.
    pub audio: u64,
    /// Video tags.
    pub video: u64,
    /// Script data tags.
    pub script: u64,
    /// Tags of any other type.
    pub other: u64,
}

impl TagCounts {
    /// Counts one tag of the given type.
    pub const fn record(&mut self, tag_type: FlvTagType) {
        self.total += 1;
        match tag_type {
            FlvTagType::Audio => self.audio += 1,
            FlvTagType::Video => self.video += 1,
            FlvTagType::ScriptData => self.script += 1,
            _ => self.other += 1,
        }
    }
}

/// Index entry for a single tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TagInfo {
    /// Absolute file offset of the tag header.
    pub offset: u64,
    /// The type of the tag.
    pub tag_type: FlvTagType,
    /// Payload size in bytes.
    pub data_size: u32,
    /// Timestamp in milliseconds.
    pub timestamp_ms: u32,
    /// Stream id.
    pub stream_id: u32,
}

impl TagInfo {
    pub(crate) const fn new(offset: u64, header: &FlvTagHeader) -> Self {
        Self {
            offset,
            tag_type: header.tag_type,
            data_size: header.data_size,
            timestamp_ms: header.timestamp_ms,
            stream_id: header.stream_id,
        }
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn parse_tag_header() {
        #[rustfmt::skip]
        let bytes = [
            0x29, // filter bit + video
            0x00, 0x01, 0x2C, // data size 300
            0x12, 0x34, 0x56, // timestamp
            0x01, // extended timestamp
            0x00, 0x00, 0x00, // stream id
        ];

        let header = FlvTagHeader::parse(&bytes);
        insta::assert_debug_snapshot!(header, @r"
        FlvTagHeader {
            filter: true,
            tag_type: FlvTagType::Video,
            data_size: 300,
            timestamp_ms: 18035798,
            stream_id: 0,
        }
        ");
        assert_eq!(header.timestamp_ms, 0x0112_3456);
    }

    #[test]
    fn counts_add_up() {
        let mut counts = TagCounts::default();
        for tag_type in [8, 9, 9, 18, 7, 31, 8] {
            counts.record(FlvTagType(tag_type));
        }

        assert_eq!(counts.total, 7);
        assert_eq!(counts.audio + counts.video + counts.script + counts.other, counts.total);
        assert_eq!((counts.audio, counts.video, counts.script, counts.other), (2, 2, 1, 2));
    }
}
