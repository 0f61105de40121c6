//! AMF0 decoder

use byteorder::{BigEndian, ByteOrder};
use num_traits::FromPrimitive;

use crate::{Amf0Error, Amf0Marker, Amf0Object, Amf0Value};

/// Maximum depth of nested objects and arrays accepted by [`decode`].
pub const MAX_NESTING_DEPTH: usize = 64;

/// Decode one AMF0 value from `buf` starting at `offset`.
///
/// Returns the value and the offset of the first byte after it. The buffer is
/// never modified, so consecutive values can be decoded by feeding the
/// returned offset back in.
pub fn decode(buf: &[u8], offset: usize) -> Result<(Amf0Value, usize), Amf0Error> {
    let mut decoder = Decoder { buf, pos: offset };
    let value = decoder.decode_value(0)?;
    Ok((value, decoder.pos))
}

struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    fn take(&mut self, len: usize, context: &'static str) -> Result<&'a [u8], Amf0Error> {
        let start = self.pos;
        let slice = start
            .checked_add(len)
            .and_then(|end| self.buf.get(start..end))
            .ok_or(Amf0Error::Truncated { context, offset: start })?;
        self.pos += len;
        Ok(slice)
    }

    fn read_u8(&mut self, context: &'static str) -> Result<u8, Amf0Error> {
        Ok(self.take(1, context)?[0])
    }

    fn read_u16(&mut self, context: &'static str) -> Result<u16, Amf0Error> {
        Ok(BigEndian::read_u16(self.take(2, context)?))
    }

    fn read_u32(&mut self, context: &'static str) -> Result<u32, Amf0Error> {
        Ok(BigEndian::read_u32(self.take(4, context)?))
    }

    fn read_f64(&mut self, context: &'static str) -> Result<f64, Amf0Error> {
        Ok(BigEndian::read_f64(self.take(8, context)?))
    }

    fn read_utf8(&mut self, len: usize, context: &'static str) -> Result<String, Amf0Error> {
        let bytes = self.take(len, context)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    fn decode_value(&mut self, depth: usize) -> Result<Amf0Value, Amf0Error> {
        let offset = self.pos;
        let raw = self.read_u8("marker")?;
        let unsupported = Amf0Error::UnsupportedMarker { marker: raw, offset };
        let marker = Amf0Marker::from_u8(raw).ok_or(unsupported)?;

        match marker {
            Amf0Marker::Number => self.read_f64("number").map(Amf0Value::Number),
            Amf0Marker::Boolean => self.read_u8("boolean").map(|b| Amf0Value::Boolean(b != 0)),
            Amf0Marker::String => {
                let len = self.read_u16("string length")? as usize;
                self.read_utf8(len, "string").map(Amf0Value::String)
            }
            Amf0Marker::LongString => {
                let len = self.read_u32("long string length")? as usize;
                self.read_utf8(len, "long string").map(Amf0Value::LongString)
            }
            Amf0Marker::Null | Amf0Marker::Undefined => Ok(Amf0Value::Null),
            Amf0Marker::Object => self.decode_object_body(depth, offset).map(Amf0Value::Object),
            Amf0Marker::EcmaArray => {
                // The count is only a hint, the end marker terminates the array.
                self.read_u32("ecma array count")?;
                self.decode_object_body(depth, offset).map(Amf0Value::EcmaArray)
            }
            Amf0Marker::StrictArray => self.decode_strict_array(depth, offset).map(Amf0Value::StrictArray),
            Amf0Marker::Date => {
                let millis = self.read_f64("date")?;
                self.take(2, "date timezone")?;
                Ok(Amf0Value::Date(millis))
            }
            _ => Err(Amf0Error::UnsupportedMarker { marker: raw, offset }),
        }
    }

    fn decode_object_body(&mut self, depth: usize, offset: usize) -> Result<Amf0Object, Amf0Error> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(Amf0Error::TooDeep { offset });
        }

        let mut object = Amf0Object::new();

        loop {
            // Object keys are not preceded by a marker and are always normal strings
            let len = self.read_u16("property name length")? as usize;

            // The object end marker is preceded by an empty key
            if len == 0 && self.buf.get(self.pos) == Some(&(Amf0Marker::ObjectEnd as u8)) {
                self.pos += 1;
                return Ok(object);
            }

            let key = self.read_utf8(len, "property name")?;
            let value = self.decode_value(depth + 1)?;
            object.push(key, value);
        }
    }

    fn decode_strict_array(&mut self, depth: usize, offset: usize) -> Result<Vec<Amf0Value>, Amf0Error> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(Amf0Error::TooDeep { offset });
        }

        let count = self.read_u32("strict array count")?;
        // Every element takes at least one byte.
        let mut values = Vec::with_capacity((count as usize).min(self.buf.len().saturating_sub(self.pos)));

        for _ in 0..count {
            values.push(self.decode_value(depth + 1)?);
        }

        Ok(values)
    }
}
