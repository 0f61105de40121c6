//! H.264 (AVC) header parsing.
//!
//! Only the parts needed to describe a stream are decoded: the
//! `AVCDecoderConfigurationRecord` carried in FLV/MP4 sequence headers and
//! the leading fields of the sequence parameter set up to and including
//! frame cropping, which is enough to compute the displayed resolution.
//!
//! [`EmulationPreventionIo`] is shared with the H.265 crate since both
//! codecs use the same `0x000003` escaping.
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(unreachable_pub)]
#![deny(clippy::missing_const_for_fn)]

mod config;
mod enums;
mod io;
mod sps;

pub use self::config::{AVCDecoderConfigurationRecord, AvccExtendedConfig};
pub use self::enums::NALUnitType;
pub use self::io::EmulationPreventionIo;
pub use self::sps::{FrameCropInfo, Sps, SpsExtended};
