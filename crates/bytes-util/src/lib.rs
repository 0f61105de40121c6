//! Byte and bit level helpers shared by the codec header parsers.
//!
//! The main type is [`BitReader`], an MSB-first bit cursor over any
//! [`std::io::Read`] source. It also implements [`std::io::Read`] itself so
//! byte oriented helpers such as `byteorder` keep working when the cursor
//! is not byte aligned.
//!
//! [`BytesCursorExt`] slices zero-copy [`bytes::Bytes`] out of an
//! [`std::io::Cursor`] when a parser needs to keep nested payloads around.
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(unreachable_pub)]

mod bit_read;
mod bytes_cursor;

pub use bit_read::BitReader;
pub use bytes_cursor::BytesCursorExt;
