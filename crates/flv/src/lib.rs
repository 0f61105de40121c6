//! A single-pass inspector for FLV files and Enhanced RTMP tag streams.
//!
//! [`FlvReport::inspect`] walks a container from the first byte to the last
//! without seeking, counting tags, decoding `onMetaData` script records and
//! extracting codec configuration records from video and audio sequence
//! headers.
//!
//! ## Specifications
//!
//! | Name | Version | Link | Comments |
//! | --- | --- | --- | --- |
//! | Adobe Flash Video File Format Specification | `10.1` | <https://github.com/veovera/enhanced-rtmp/blob/main/docs/legacy/video-file-format-v10-1-spec.pdf> | Refered to as 'Legacy FLV spec' in this documentation |
//! | Enhanced RTMP | `v2-2024-10-22-b1` | <https://github.com/veovera/enhanced-rtmp/blob/main/docs/enhanced/enhanced-rtmp-v2.pdf> | Refered to as 'Enhanced RTMP spec' in this documentation |
//!
//! ## Example
//!
//! ```rust
//! # fn test() -> Result<(), erlab_flv::error::FlvError> {
//! use erlab_flv::FlvReport;
//!
//! // header only, followed by the first previous tag size
//! let bytes = [b'F', b'L', b'V', 1, 0x05, 0, 0, 0, 9, 0, 0, 0, 0];
//! let report = FlvReport::inspect(&bytes[..])?;
//!
//! assert!(report.header.has_video);
//! assert_eq!(report.tag_counts.total, 0);
//! # Ok(())
//! # }
//! # test().expect("test failed");
//! ```
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(unreachable_pub)]

pub mod audio;
pub mod codec;
pub mod error;
pub mod file;
pub mod header;
pub mod script;
pub mod tag;
pub mod video;

mod reader;

pub use codec::{CodecConfigurationRecord, ConfigField, FieldValue, TrackKind};
pub use file::FlvReport;
