//! Field builders for video configuration records.

use std::io;

use bytes::Bytes;
use erlab_av1::AV1CodecConfigurationRecord;
use erlab_h264::AVCDecoderConfigurationRecord;
use erlab_h265::HEVCDecoderConfigurationRecord;
use erlab_vp9::VpCodecConfigurationRecord;

use crate::codec::CodecConfigurationRecord;

/// Size of the AVCDecoderConfigurationRecord header up to `numOfSequenceParameterSets`.
const AVC_HEADER_SIZE: usize = 6;

pub(crate) fn avc(record: &mut CodecConfigurationRecord, data: Bytes) {
    if data.len() < AVC_HEADER_SIZE {
        record.push("error", "truncated");
        return;
    }

    record.push("configurationVersion", data[0]);
    record.push("AVCProfileIndication", data[1]);
    record.push("profile_compatibility", format!("0x{:02X}", data[2]));
    record.push("AVCLevelIndication", data[3]);
    record.push("lengthSizeMinusOne", data[4] & 0b0000_0011);
    record.push("numOfSPS", data[5] & 0b0001_1111);

    match avc_resolution(data) {
        Ok(Some((width, height))) => {
            record.push("width", width);
            record.push("height", height);
        }
        Ok(None) => tracing::debug!("avc record carries no sps"),
        Err(err) => tracing::warn!(%err, "failed to decode avc sps"),
    }
}

fn avc_resolution(data: Bytes) -> io::Result<Option<(u64, u64)>> {
    let Some(sps) = AVCDecoderConfigurationRecord::demux_first_sps(&mut io::Cursor::new(data))? else {
        return Ok(None);
    };

    let sps = erlab_h264::Sps::parse_with_emulation_prevention(&sps[..])?;
    Ok(Some((sps.width, sps.height)))
}

pub(crate) fn hevc(record: &mut CodecConfigurationRecord, data: Bytes) {
    if data.len() < HEVCDecoderConfigurationRecord::FIXED_SIZE {
        record.push("error", "truncated");
        return;
    }

    record.push("configurationVersion", data[0]);
    record.push("general_profile_space", data[1] >> 6);
    record.push("general_tier_flag", (data[1] >> 5) & 0b1);
    record.push("general_profile_idc", data[1] & 0b0001_1111);
    record.push("general_level_idc", data[12]);
    record.push("chroma_format_idc", data[16] & 0b0000_0011);
    record.push("bit_depth_luma", (data[17] & 0b0000_0111) + 8);
    record.push("bit_depth_chroma", (data[18] & 0b0000_0111) + 8);
    record.push("avgFrameRate", u16::from_be_bytes([data[19], data[20]]));
    record.push("numTemporalLayers", (data[21] >> 3) & 0b0000_0111);
    record.push("lengthSizeMinusOne", data[21] & 0b0000_0011);
    record.push("numOfArrays", data[22]);

    match hevc_resolution(data) {
        Ok(Some((width, height))) => {
            record.push("width", width);
            record.push("height", height);
        }
        Ok(None) => tracing::debug!("hevc record carries no sps"),
        Err(err) => tracing::warn!(%err, "failed to decode hevc sps"),
    }
}

fn hevc_resolution(data: Bytes) -> io::Result<Option<(u64, u64)>> {
    let Some(sps) = HEVCDecoderConfigurationRecord::demux_first_sps(&mut io::Cursor::new(data))? else {
        return Ok(None);
    };

    let sps = erlab_h265::Sps::parse_with_emulation_prevention(&sps[..])?;
    Ok(Some((sps.width, sps.height)))
}

pub(crate) fn av1(record: &mut CodecConfigurationRecord, data: Bytes) {
    let size = data.len();
    let config = match AV1CodecConfigurationRecord::demux(&mut io::Cursor::new(data)) {
        Ok(config) => config,
        Err(err) => {
            tracing::debug!(%err, size, "av1 record too short");
            record.push("size", size);
            return;
        }
    };

    record.push("marker", config.marker as u8);
    record.push("version", config.version);
    record.push("seq_profile", config.seq_profile);
    record.push("seq_level_idx_0", config.seq_level_idx_0);
    record.push("seq_tier_0", config.seq_tier_0 as u8);
    record.push("bit_depth", config.bit_depth());
    record.push("monochrome", config.monochrome);
    record.push("chroma_subsampling_x", config.chroma_subsampling_x as u8);
    record.push("chroma_subsampling_y", config.chroma_subsampling_y as u8);
    record.push("chroma_sample_position", config.chroma_sample_position);
    record.push(
        "initial_presentation_delay_present",
        config.initial_presentation_delay_minus_one.is_some() as u8,
    );
    if let Some(delay) = config.initial_presentation_delay_minus_one {
        record.push("initial_presentation_delay_minus_one", delay);
    }
    record.push("config_obus_size", config.config_obu.len());

    match config.sequence_header() {
        Some(seq) => {
            record.push("max_frame_width", seq.max_frame_width);
            record.push("max_frame_height", seq.max_frame_height);
        }
        None if config.config_obu.is_empty() => {}
        None => tracing::warn!("no decodable av1 sequence header in config obus"),
    }
}

pub(crate) fn vp9(record: &mut CodecConfigurationRecord, data: Bytes) {
    let config = match VpCodecConfigurationRecord::demux(&mut io::Cursor::new(data)) {
        Ok(config) => config,
        Err(err) => {
            tracing::debug!(%err, "vp9 record too short");
            record.push("error", "truncated");
            return;
        }
    };

    record.push("profile", config.profile);
    record.push("level", config.level);
    record.push("bit_depth", config.bit_depth);
    record.push("chroma_subsampling", config.chroma_subsampling);
    record.push("videoFullRangeFlag", config.video_full_range_flag as u8);
}
