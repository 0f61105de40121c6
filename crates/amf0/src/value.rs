//! AMF0 value types.

/// An ordered list of named properties.
///
/// Used for both AMF0 objects and ECMA arrays. Insertion order is preserved
/// and duplicate names are kept as they appear on the wire.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct Amf0Object(Vec<(String, Amf0Value)>);

impl Amf0Object {
    /// Create an empty object.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a property.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Amf0Value>) {
        self.0.push((name.into(), value.into()));
    }

    /// Returns the value of the first property named `name`.
    pub fn get(&self, name: &str) -> Option<&Amf0Value> {
        self.0.iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    /// Iterate over the properties in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Amf0Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the object has no properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Amf0Value>> FromIterator<(K, V)> for Amf0Object {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl IntoIterator for Amf0Object {
    type IntoIter = std::vec::IntoIter<(String, Amf0Value)>;
    type Item = (String, Amf0Value);

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Represents any AMF0 value.
///
/// Undefined decodes to [`Amf0Value::Null`].
#[derive(Debug, PartialEq, Clone)]
pub enum Amf0Value {
    /// AMF0 Number.
    Number(f64),
    /// AMF0 Boolean.
    Boolean(bool),
    /// AMF0 String.
    String(String),
    /// AMF0 Object.
    Object(Amf0Object),
    /// AMF0 Null.
    Null,
    /// AMF0 ECMA array.
    EcmaArray(Amf0Object),
    /// AMF0 strict array.
    StrictArray(Vec<Amf0Value>),
    /// AMF0 Date, milliseconds since the unix epoch. The timezone is not kept.
    Date(f64),
    /// AMF0 long string.
    LongString(String),
}

impl Amf0Value {
    /// Returns the string content of a String or LongString.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Amf0Value::String(s) | Amf0Value::LongString(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the properties of an Object or EcmaArray.
    pub fn as_object(&self) -> Option<&Amf0Object> {
        match self {
            Amf0Value::Object(o) | Amf0Value::EcmaArray(o) => Some(o),
            _ => None,
        }
    }

    /// Consumes the value and returns the properties of an Object or EcmaArray.
    pub fn into_object(self) -> Option<Amf0Object> {
        match self {
            Amf0Value::Object(o) | Amf0Value::EcmaArray(o) => Some(o),
            _ => None,
        }
    }
}

impl From<f64> for Amf0Value {
    fn from(value: f64) -> Self {
        Amf0Value::Number(value)
    }
}

impl From<bool> for Amf0Value {
    fn from(value: bool) -> Self {
        Amf0Value::Boolean(value)
    }
}

impl From<String> for Amf0Value {
    fn from(value: String) -> Self {
        Amf0Value::String(value)
    }
}

impl From<&str> for Amf0Value {
    fn from(value: &str) -> Self {
        Amf0Value::String(value.to_owned())
    }
}

impl From<Amf0Object> for Amf0Value {
    fn from(value: Amf0Object) -> Self {
        Amf0Value::Object(value)
    }
}

impl From<Vec<Amf0Value>> for Amf0Value {
    fn from(value: Vec<Amf0Value>) -> Self {
        Amf0Value::StrictArray(value)
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl serde::ser::Serialize for Amf0Object {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.len()))?;

        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }

        map.end()
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl serde::ser::Serialize for Amf0Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;

        match self {
            Amf0Value::Number(v) | Amf0Value::Date(v) => serializer.serialize_f64(*v),
            Amf0Value::Boolean(v) => serializer.serialize_bool(*v),
            Amf0Value::String(v) | Amf0Value::LongString(v) => serializer.serialize_str(v),
            Amf0Value::Object(v) | Amf0Value::EcmaArray(v) => v.serialize(serializer),
            Amf0Value::Null => serializer.serialize_none(),
            Amf0Value::StrictArray(v) => {
                let mut seq = serializer.serialize_seq(Some(v.len()))?;

                for value in v {
                    seq.serialize_element(value)?;
                }

                seq.end()
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn object_keeps_order() {
        let object: Amf0Object = [("width", Amf0Value::Number(1920.0)), ("height", Amf0Value::Number(1080.0))]
            .into_iter()
            .collect();

        let names: Vec<_> = object.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["width", "height"]);
        assert_eq!(object.get("height"), Some(&Amf0Value::Number(1080.0)));
        assert_eq!(object.get("duration"), None);
    }

    #[test]
    fn accessors() {
        assert_eq!(Amf0Value::LongString("x".into()).as_str(), Some("x"));
        assert_eq!(Amf0Value::Null.as_str(), None);

        let mut object = Amf0Object::new();
        object.push("a", true);
        assert_eq!(Amf0Value::EcmaArray(object.clone()).as_object(), Some(&object));
        assert_eq!(Amf0Value::Object(object.clone()).into_object(), Some(object));
        assert_eq!(Amf0Value::Number(1.0).into_object(), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serialize_as_ordered_map() {
        let mut inner = Amf0Object::new();
        inner.push("z", Amf0Value::Null);
        let mut object = Amf0Object::new();
        object.push("encoder", "Lavf61.7.100");
        object.push("stereo", true);
        object.push("keyframes", Amf0Value::StrictArray(vec![0.0.into(), 2.5.into()]));
        object.push("extra", Amf0Value::EcmaArray(inner));

        let json = serde_json::to_string(&Amf0Value::Object(object)).expect("serialize");
        assert_eq!(
            json,
            r#"{"encoder":"Lavf61.7.100","stereo":true,"keyframes":[0.0,2.5],"extra":{"z":null}}"#
        );
    }
}
