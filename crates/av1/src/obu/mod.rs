use std::io;

use byteorder::ReadBytesExt;
use erlab_bytes_util::BitReader;
use nutype_enum::nutype_enum;

pub(crate) mod seq;

use seq::SequenceHeaderObu;

/// LEB128 values are at most 8 bytes in a conforming stream. We accept up
/// to 10 so any u64 can be represented.
const MAX_LEB128_BYTES: usize = 10;

nutype_enum! {
    /// OBU types.
    ///
    /// AV1-Spec-2 - 6.2.2
    pub enum ObuType(u8) {
        /// `OBU_SEQUENCE_HEADER`
        SequenceHeader = 1,
        /// `OBU_TEMPORAL_DELIMITER`
        TemporalDelimiter = 2,
        /// `OBU_FRAME_HEADER`
        FrameHeader = 3,
        /// `OBU_TILE_GROUP`
        TileGroup = 4,
        /// `OBU_METADATA`
        Metadata = 5,
        /// `OBU_FRAME`
        Frame = 6,
        /// `OBU_REDUNDANT_FRAME_HEADER`
        RedundantFrameHeader = 7,
        /// `OBU_TILE_LIST`
        TileList = 8,
        /// `OBU_PADDING`
        Padding = 15,
    }
}

/// OBU Header
///
/// AV1-Spec-2 - 5.3.1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObuHeader {
    /// The type of the OBU.
    pub obu_type: ObuType,
    /// The payload size, when `obu_has_size_field` is set.
    pub size: Option<u64>,
    /// The extension header, when `obu_extension_flag` is set.
    pub extension_header: Option<ObuExtensionHeader>,
}

/// OBU Extension Header
///
/// AV1-Spec-2 - 5.3.3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObuExtensionHeader {
    /// `temporal_id`
    pub temporal_id: u8,
    /// `spatial_id`
    pub spatial_id: u8,
}

impl ObuHeader {
    /// Parses an OBU header and, if present, its LEB128 size field. The
    /// reader is left at the start of the payload.
    pub fn parse(reader: &mut impl io::Read) -> io::Result<Self> {
        let mut bit_reader = BitReader::new(reader);

        bit_reader.skip_bits(1)?; // obu_forbidden_bit
        let obu_type = ObuType::from(bit_reader.read_bits(4)? as u8);
        let obu_extension_flag = bit_reader.read_bit()?;
        let obu_has_size_field = bit_reader.read_bit()?;
        bit_reader.skip_bits(1)?; // obu_reserved_1bit

        let extension_header = if obu_extension_flag {
            let temporal_id = bit_reader.read_bits(3)? as u8;
            let spatial_id = bit_reader.read_bits(2)? as u8;
            bit_reader.skip_bits(3)?; // extension_header_reserved_3bits
            Some(ObuExtensionHeader { temporal_id, spatial_id })
        } else {
            None
        };

        let size = if obu_has_size_field {
            Some(read_leb128(bit_reader.into_inner())?)
        } else {
            None
        };

        Ok(Self {
            obu_type,
            size,
            extension_header,
        })
    }
}

/// Reads an unsigned LEB128 value: 7-bit groups, least significant group
/// first, with the high bit of each byte set when another byte follows.
///
/// AV1-Spec-2 - 4.10.5
pub fn read_leb128<R: io::Read + ?Sized>(reader: &mut R) -> io::Result<u64> {
    let mut value = 0;
    for i in 0..MAX_LEB128_BYTES {
        let byte = reader.read_u8()?;
        value |= ((byte & 0x7F) as u64) << (i * 7);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }

    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        "leb128 value is longer than 10 bytes",
    ))
}

/// Walks a buffer of concatenated OBUs and returns the first sequence
/// header that parses.
///
/// OBUs without a size field extend to the end of the buffer, so the walk
/// stops after one of those. A size field that points past the end of the
/// buffer, or a header that cannot be read, ends the walk.
pub fn find_sequence_header(obus: &[u8]) -> Option<SequenceHeaderObu> {
    let mut cursor = io::Cursor::new(obus);

    while (cursor.position() as usize) < obus.len() {
        let header = ObuHeader::parse(&mut cursor).ok()?;

        let start = cursor.position() as usize;
        let end = match header.size {
            Some(size) => start.checked_add(usize::try_from(size).ok()?).filter(|end| *end <= obus.len())?,
            None => obus.len(),
        };
        cursor.set_position(end as u64);

        if header.obu_type == ObuType::SequenceHeader {
            if let Ok(seq) = SequenceHeaderObu::parse(&mut BitReader::new_from_slice(&obus[start..end])) {
                return Some(seq);
            }
        }

        if header.size.is_none() {
            break;
        }
    }

    None
}
