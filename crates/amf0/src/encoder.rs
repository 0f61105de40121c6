//! AMF0 encoder

use std::io;

use byteorder::{BigEndian, WriteBytesExt};

use crate::{Amf0Error, Amf0Marker, Amf0Object, Amf0Value};

/// AMF0 encoder.
///
/// Provides various functions to encode different types of AMF0 values into a writer.
#[derive(Debug)]
pub struct Amf0Encoder<W> {
    writer: W,
}

impl<W> Amf0Encoder<W> {
    /// Create a new encoder from a writer.
    pub const fn new(writer: W) -> Self {
        Amf0Encoder { writer }
    }

    /// Consume the encoder and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> Amf0Encoder<W>
where
    W: io::Write,
{
    /// Encode any [`Amf0Value`].
    pub fn encode_value(&mut self, value: &Amf0Value) -> Result<(), Amf0Error> {
        match value {
            Amf0Value::Number(v) => self.encode_number(*v),
            Amf0Value::Boolean(v) => self.encode_boolean(*v),
            Amf0Value::String(v) | Amf0Value::LongString(v) => self.encode_string(v),
            Amf0Value::Object(v) => self.encode_object(v),
            Amf0Value::Null => self.encode_null(),
            Amf0Value::EcmaArray(v) => self.encode_ecma_array(v),
            Amf0Value::StrictArray(v) => self.encode_strict_array(v),
            Amf0Value::Date(v) => self.encode_date(*v),
        }
    }

    /// Encode a [`bool`] as a AMF0 boolean value.
    pub fn encode_boolean(&mut self, value: bool) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::Boolean as u8)?;
        self.writer.write_u8(value as u8)?;
        Ok(())
    }

    /// Encode a [`f64`] as a AMF0 number value.
    pub fn encode_number(&mut self, value: f64) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::Number as u8)?;
        self.writer.write_f64::<BigEndian>(value)?;
        Ok(())
    }

    /// Encode a [`&str`](str) as a AMF0 string value.
    ///
    /// This function decides based on the length of the given string slice whether to use a normal string or a long string.
    pub fn encode_string(&mut self, value: &str) -> Result<(), Amf0Error> {
        let len = value.len();

        if len <= (u16::MAX as usize) {
            // Normal string
            self.writer.write_u8(Amf0Marker::String as u8)?;
            self.writer.write_u16::<BigEndian>(len as u16)?;
            self.writer.write_all(value.as_bytes())?;
        } else {
            // This try_into fails if the length is greater than u32::MAX
            let len: u32 = len.try_into()?;

            self.writer.write_u8(Amf0Marker::LongString as u8)?;
            self.writer.write_u32::<BigEndian>(len)?;
            self.writer.write_all(value.as_bytes())?;
        }

        Ok(())
    }

    /// Encode AMF0 Null value.
    pub fn encode_null(&mut self) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::Null as u8)?;
        Ok(())
    }

    /// Encode AMF0 Undefined value.
    pub fn encode_undefined(&mut self) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::Undefined as u8)?;
        Ok(())
    }

    /// Encode a date in milliseconds since the unix epoch with a zero timezone.
    pub fn encode_date(&mut self, millis: f64) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::Date as u8)?;
        self.writer.write_f64::<BigEndian>(millis)?;
        self.writer.write_i16::<BigEndian>(0)?;
        Ok(())
    }

    /// Encode a slice of values as an AMF0 StrictArray value.
    pub fn encode_strict_array(&mut self, values: &[Amf0Value]) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::StrictArray as u8)?;
        self.writer.write_u32::<BigEndian>(values.len().try_into()?)?;

        for value in values {
            self.encode_value(value)?;
        }

        Ok(())
    }

    /// Encode an [`Amf0Object`] as an AMF0 Object value.
    pub fn encode_object(&mut self, values: &Amf0Object) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::Object as u8)?;
        self.encode_object_body(values)
    }

    /// Encode an [`Amf0Object`] as an AMF0 EcmaArray value.
    pub fn encode_ecma_array(&mut self, values: &Amf0Object) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::EcmaArray as u8)?;
        self.writer.write_u32::<BigEndian>(values.len().try_into()?)?;
        self.encode_object_body(values)
    }

    fn encode_object_body(&mut self, values: &Amf0Object) -> Result<(), Amf0Error> {
        for (key, value) in values.iter() {
            self.writer.write_u16::<BigEndian>(key.len().try_into()?)?;
            self.writer.write_all(key.as_bytes())?;
            self.encode_value(value)?;
        }

        self.writer.write_u24::<BigEndian>(Amf0Marker::ObjectEnd as u32)?;
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;
    use crate::decode;

    #[test]
    fn encode_scalars() {
        let mut buf = Vec::new();
        let mut encoder = Amf0Encoder::new(&mut buf);
        encoder.encode_number(3.5).unwrap();
        encoder.encode_boolean(true).unwrap();
        encoder.encode_null().unwrap();
        encoder.encode_undefined().unwrap();
        encoder.encode_string("ab").unwrap();

        #[rustfmt::skip]
        assert_eq!(buf, [
            0x00, 0x40, 0x0C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x01, 0x01,
            0x05,
            0x06,
            0x02, 0x00, 0x02, b'a', b'b',
        ]);
    }

    #[test]
    fn encode_object() {
        let mut object = Amf0Object::new();
        object.push("a", true);

        let mut buf = Vec::new();
        Amf0Encoder::new(&mut buf).encode_object(&object).unwrap();
        assert_eq!(buf, [0x03, 0x00, 0x01, b'a', 0x01, 0x01, 0x00, 0x00, 0x09]);

        let mut buf = Vec::new();
        Amf0Encoder::new(&mut buf).encode_ecma_array(&object).unwrap();
        assert_eq!(buf, [0x08, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, b'a', 0x01, 0x01, 0x00, 0x00, 0x09]);
    }

    #[test]
    fn long_string_switch() {
        let long = "x".repeat(u16::MAX as usize + 1);
        let mut buf = Vec::new();
        Amf0Encoder::new(&mut buf).encode_string(&long).unwrap();
        assert_eq!(&buf[..5], [0x0C, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(buf.len(), 5 + long.len());

        let (value, _) = decode(&buf, 0).unwrap();
        assert_eq!(value.as_str().map(str::len), Some(long.len()));
    }

    #[test]
    fn metadata_decodes_back() {
        let mut object = Amf0Object::new();
        object.push("duration", 12.5);
        object.push("encoder", "Lavf61.7.100");
        object.push("hasVideo", true);
        object.push("keyframes", Amf0Value::StrictArray(vec![Amf0Value::Date(0.0), Amf0Value::Null]));
        let value = Amf0Value::EcmaArray(object);

        let mut encoder = Amf0Encoder::new(Vec::new());
        encoder.encode_value(&value).unwrap();
        let buf = encoder.into_inner();

        let (decoded, offset) = decode(&buf, 0).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(offset, buf.len());
    }
}
