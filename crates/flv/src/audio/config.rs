//! Field builders for audio configuration records.

use erlab_aac::PartialAudioSpecificConfig;
use erlab_flac::StreamInfo;
use erlab_opus::OpusHead;

use crate::codec::CodecConfigurationRecord;

pub(crate) fn aac(record: &mut CodecConfigurationRecord, data: &[u8]) {
    let config = match PartialAudioSpecificConfig::parse(data) {
        Ok(config) => config,
        Err(err) => {
            tracing::debug!(%err, "aac config too short");
            record.push("error", "truncated");
            return;
        }
    };

    record.push("audioObjectType", config.audio_object_type.0);
    record.push("samplingFrequency", config.sampling_frequency);
    record.push("channelConfiguration", config.channel_configuration);
}

pub(crate) fn opus(record: &mut CodecConfigurationRecord, data: &[u8]) {
    if data.len() < OpusHead::MIN_SIZE {
        record.push("size", data.len());
        return;
    }

    let head = match OpusHead::parse(data) {
        Ok(head) => head,
        Err(err) => {
            tracing::debug!(%err, "not an OpusHead");
            record.push("size", data.len());
            return;
        }
    };

    record.push("version", head.version);
    record.push("channels", head.channel_count);
    record.push("preSkip", head.pre_skip);
    record.push("inputSampleRate", head.input_sample_rate);
    record.push("outputGain", head.output_gain);
    record.push("mappingFamily", head.channel_mapping_family);
}

pub(crate) fn flac(record: &mut CodecConfigurationRecord, data: &[u8]) {
    let info = match StreamInfo::locate(data).map(StreamInfo::parse) {
        Some(Ok(info)) => info,
        Some(Err(err)) => {
            tracing::debug!(%err, "failed to decode flac stream info");
            record.push("size", data.len());
            return;
        }
        None => {
            record.push("size", data.len());
            return;
        }
    };

    record.push("minBlockSize", info.min_block_size);
    record.push("maxBlockSize", info.max_block_size);
    record.push("sampleRate", info.sample_rate);
    record.push("channels", info.channels);
    record.push("bitsPerSample", info.bits_per_sample);
}
