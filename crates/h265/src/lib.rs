//! H.265 (HEVC) header parsing.
//!
//! Decodes the `HEVCDecoderConfigurationRecord` found in FLV/MP4 sequence
//! headers and the sequence parameter set fields needed to compute the
//! cropped picture size.
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(unreachable_pub)]
#![deny(clippy::missing_const_for_fn)]

mod config;
mod sps;

pub use self::config::{HEVCDecoderConfigurationRecord, NaluArray, NaluType};
pub use self::sps::{ConformanceWindow, Sps};
