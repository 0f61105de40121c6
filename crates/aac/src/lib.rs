//! Decoding of the fixed leading fields of an AAC `AudioSpecificConfig`.
//!
//! ISO/IEC 14496-3:2019 - 1.6.2.1
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(unreachable_pub)]

use std::io;

use erlab_bytes_util::BitReader;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use nutype_enum::nutype_enum;

/// The first 13 bits of an `AudioSpecificConfig`.
///
/// Escaped object types (31) and explicit sampling frequencies (index 15)
/// are not expanded, so everything here fits in two bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialAudioSpecificConfig {
    /// Audio Object Type
    pub audio_object_type: AudioObjectType,
    /// The raw 4-bit sampling frequency index.
    pub sampling_frequency_index: u8,
    /// Sampling Frequency, 0 when the index is not one of the standard rates.
    pub sampling_frequency: u32,
    /// Channel Configuration
    pub channel_configuration: u8,
}

nutype_enum! {
    /// AAC Audio Object Types, ISO/IEC 14496-3:2019 Table 1.17.
    pub enum AudioObjectType(u8) {
        /// AAC Main
        AacMain = 1,
        /// AAC LC
        AacLowComplexity = 2,
        /// AAC SSR
        AacScalableSampleRate = 3,
        /// AAC LTP
        AacLongTermPrediction = 4,
        /// Spectral Band Replication (HE-AAC)
        SpectralBandReplication = 5,
        /// AAC Scalable
        AacScalable = 6,
        /// Parametric Stereo (HE-AAC v2)
        ParametricStereo = 29,
        /// Escape value, the real type follows in 6 more bits
        Escape = 31,
    }
}

/// Sampling Frequency Index, ISO/IEC 14496-3:2019 Table 1.22.
#[derive(FromPrimitive, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SampleFrequencyIndex {
    /// 96000 Hz
    Freq96000 = 0x0,
    /// 88200 Hz
    Freq88200 = 0x1,
    /// 64000 Hz
    Freq64000 = 0x2,
    /// 48000 Hz
    Freq48000 = 0x3,
    /// 44100 Hz
    Freq44100 = 0x4,
    /// 32000 Hz
    Freq32000 = 0x5,
    /// 24000 Hz
    Freq24000 = 0x6,
    /// 22050 Hz
    Freq22050 = 0x7,
    /// 16000 Hz
    Freq16000 = 0x8,
    /// 12000 Hz
    Freq12000 = 0x9,
    /// 11025 Hz
    Freq11025 = 0xA,
    /// 8000 Hz
    Freq8000 = 0xB,
    /// 7350 Hz
    Freq7350 = 0xC,
}

impl SampleFrequencyIndex {
    /// Returns the frequency in Hz.
    pub const fn to_freq(&self) -> u32 {
        match self {
            SampleFrequencyIndex::Freq96000 => 96000,
            SampleFrequencyIndex::Freq88200 => 88200,
            SampleFrequencyIndex::Freq64000 => 64000,
            SampleFrequencyIndex::Freq48000 => 48000,
            SampleFrequencyIndex::Freq44100 => 44100,
            SampleFrequencyIndex::Freq32000 => 32000,
            SampleFrequencyIndex::Freq24000 => 24000,
            SampleFrequencyIndex::Freq22050 => 22050,
            SampleFrequencyIndex::Freq16000 => 16000,
            SampleFrequencyIndex::Freq12000 => 12000,
            SampleFrequencyIndex::Freq11025 => 11025,
            SampleFrequencyIndex::Freq8000 => 8000,
            SampleFrequencyIndex::Freq7350 => 7350,
        }
    }
}

impl PartialAudioSpecificConfig {
    /// Parses the leading fields of an `AudioSpecificConfig`. Needs at least
    /// two bytes; anything after the channel configuration is ignored.
    pub fn parse(data: &[u8]) -> io::Result<Self> {
        let mut bitreader = BitReader::new_from_slice(data);

        let audio_object_type = AudioObjectType::from(bitreader.read_bits(5)? as u8);
        let sampling_frequency_index = bitreader.read_bits(4)? as u8;
        let sampling_frequency = SampleFrequencyIndex::from_u8(sampling_frequency_index)
            .map(|index| index.to_freq())
            .unwrap_or(0);
        let channel_configuration = bitreader.read_bits(4)? as u8;

        Ok(Self {
            audio_object_type,
            sampling_frequency_index,
            sampling_frequency,
            channel_configuration,
        })
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_aac_config_parse() {
        let data = [0x12, 0x10, 0x56, 0xe5, 0x00];

        let config = PartialAudioSpecificConfig::parse(&data).unwrap();

        insta::assert_debug_snapshot!(config, @r"
        PartialAudioSpecificConfig {
            audio_object_type: AudioObjectType::AacLowComplexity,
            sampling_frequency_index: 4,
            sampling_frequency: 44100,
            channel_configuration: 2,
        }
        ");
    }

    #[test]
    fn test_aac_config_48khz_mono() {
        // AAC LC, index 3, mono
        let config = PartialAudioSpecificConfig::parse(&[0x11, 0x88]).unwrap();

        assert_eq!(config.audio_object_type, AudioObjectType::AacLowComplexity);
        assert_eq!(config.sampling_frequency, 48000);
        assert_eq!(config.channel_configuration, 1);
    }

    #[test]
    fn test_aac_config_unknown_frequency_index() {
        // HE-AAC, index 13 (reserved)
        let config = PartialAudioSpecificConfig::parse(&[0x2e, 0x90]).unwrap();

        assert_eq!(config.audio_object_type, AudioObjectType::SpectralBandReplication);
        assert_eq!(config.sampling_frequency_index, 13);
        assert_eq!(config.sampling_frequency, 0);
        assert_eq!(config.channel_configuration, 2);
    }

    #[test]
    fn test_aac_config_too_short() {
        let err = PartialAudioSpecificConfig::parse(&[0x12]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_sample_frequency_index() {
        assert_eq!(SampleFrequencyIndex::from_u8(0).map(|i| i.to_freq()), Some(96000));
        assert_eq!(SampleFrequencyIndex::from_u8(12).map(|i| i.to_freq()), Some(7350));
        assert_eq!(SampleFrequencyIndex::from_u8(15), None);
    }
}
