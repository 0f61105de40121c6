//! Codec configuration records extracted from sequence headers.

use std::fmt;

use serde::ser::SerializeMap;
use serde_derive::Serialize;

/// The kind of track a record was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// A video tag.
    Video,
    /// An audio tag.
    Audio,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Video => f.write_str("video"),
            TrackKind::Audio => f.write_str("audio"),
        }
    }
}

/// The value of a [`ConfigField`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// An integer.
    Int(i64),
    /// A string.
    Str(String),
    /// A boolean.
    Bool(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => v.fmt(f),
            FieldValue::Str(v) => v.fmt(f),
            FieldValue::Bool(v) => v.fmt(f),
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Int(value as i64)
                }
            }
        )*
    };
}

impl_from_int!(u8, u16, i16, u32, usize);

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_owned())
    }
}

/// A single named value read from a configuration record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigField {
    /// Field name, as used by the codec's own specification where one exists.
    pub name: &'static str,
    /// The value.
    pub value: FieldValue,
}

/// A codec configuration record found in a sequence header tag.
///
/// Fields appear in a fixed order per codec. Resolution fields are appended
/// last and only when the elementary stream header was fully decodable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodecConfigurationRecord {
    /// The track kind.
    pub track: TrackKind,
    /// FourCC or legacy codec name, e.g. `avc1`, `hvc1`, `mp4a`.
    pub codec: String,
    /// Decoded fields, in order.
    #[serde(serialize_with = "serialize_fields")]
    pub fields: Vec<ConfigField>,
}

impl CodecConfigurationRecord {
    pub(crate) fn new(track: TrackKind, codec: impl Into<String>) -> Self {
        Self {
            track,
            codec: codec.into(),
            fields: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, name: &'static str, value: impl Into<FieldValue>) {
        self.fields.push(ConfigField {
            name,
            value: value.into(),
        });
    }

    /// Returns the value of the field named `name`.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }
}

fn serialize_fields<S>(fields: &[ConfigField], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let mut map = serializer.serialize_map(Some(fields.len()))?;

    for field in fields {
        map.serialize_entry(field.name, &field.value)?;
    }

    map.end()
}
