//! AV1 header decoding.
//!
//! - [`AV1CodecConfigurationRecord`]: the `av1C` box body carried by
//!   MP4 and Enhanced RTMP sequence headers.
//! - [`ObuHeader`] and [`read_leb128`]: just enough OBU framing to walk the
//!   configuration OBUs that follow the record.
//! - [`SequenceHeaderObu`]: the sequence header fields up to the maximum
//!   frame size.
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(unreachable_pub)]
#![deny(clippy::missing_const_for_fn)]

mod config;
mod obu;

pub use config::AV1CodecConfigurationRecord;
pub use obu::seq::{OperatingPoint, SequenceHeaderObu, TimingInfo};
pub use obu::{ObuExtensionHeader, ObuHeader, ObuType, find_sequence_header, read_leb128};
