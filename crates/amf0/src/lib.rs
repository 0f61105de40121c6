//! AMF0 decoder and encoder.
//!
//! AMF0 is the self-describing value format carried by FLV script data tags,
//! most notably the `onMetaData` record written by muxers.
//!
//! Decoding is a pure function over a byte slice and an offset, so a caller
//! can decode several consecutive values out of one payload.
//!
//! # Limitations
//!
//! - Does not support AMF0 references, typed objects, XML documents or the
//!   AVM+ (AMF3) switch marker.
//!
//! # Examples
//!
//! ```rust
//! # fn test() -> Result<(), erlab_amf0::Amf0Error> {
//! use erlab_amf0::{Amf0Encoder, Amf0Value, decode};
//!
//! let mut buf = Vec::new();
//! let mut encoder = Amf0Encoder::new(&mut buf);
//! encoder.encode_string("onMetaData")?;
//! encoder.encode_number(29.97)?;
//!
//! let (name, offset) = decode(&buf, 0)?;
//! assert_eq!(name, Amf0Value::String("onMetaData".into()));
//!
//! let (fps, offset) = decode(&buf, offset)?;
//! assert_eq!(fps, Amf0Value::Number(29.97));
//! assert_eq!(offset, buf.len());
//! # Ok(())
//! # }
//! # test().expect("test failed");
//! ```
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(unreachable_pub)]

mod decoder;
mod encoder;
mod error;
mod value;

pub use decoder::{MAX_NESTING_DEPTH, decode};
pub use encoder::Amf0Encoder;
pub use error::Amf0Error;
pub use value::{Amf0Object, Amf0Value};

/// AMF0 marker types.
///
/// Defined by:
/// - AMF 0 spec, 2.1.
#[derive(Debug, PartialEq, Eq, Clone, Copy, num_derive::FromPrimitive)]
#[repr(u8)]
pub enum Amf0Marker {
    /// number-marker
    Number = 0x00,
    /// boolean-marker
    Boolean = 0x01,
    /// string-marker
    String = 0x02,
    /// object-marker
    Object = 0x03,
    /// movieclip-marker
    ///
    /// reserved, not supported
    MovieClip = 0x04,
    /// null-marker
    Null = 0x05,
    /// undefined-marker
    Undefined = 0x06,
    /// reference-marker
    Reference = 0x07,
    /// ecma-array-marker
    EcmaArray = 0x08,
    /// object-end-marker
    ObjectEnd = 0x09,
    /// strict-array-marker
    StrictArray = 0x0a,
    /// date-marker
    Date = 0x0b,
    /// long-string-marker
    LongString = 0x0c,
    /// unsupported-marker
    Unsupported = 0x0d,
    /// recordset-marker
    ///
    /// reserved, not supported
    Recordset = 0x0e,
    /// xml-document-marker
    XmlDocument = 0x0f,
    /// typed-object-marker
    TypedObject = 0x10,
    /// avmplus-object-marker
    ///
    /// AMF3 marker
    AVMPlusObject = 0x11,
}
