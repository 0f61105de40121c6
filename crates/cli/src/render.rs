//! Text and JSON rendering of an [`FlvReport`].

use std::io;

use erlab_amf0::Amf0Value;
use erlab_flv::FlvReport;
use serde_derive::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    file: &'a str,
    size: u64,
    #[serde(flatten)]
    report: &'a FlvReport,
}

pub fn json(out: &mut impl io::Write, path: &str, size: u64, report: &FlvReport, verbose: bool) -> anyhow::Result<()> {
    let value = JsonReport { file: path, size, report };
    let mut value = serde_json::to_value(&value)?;

    if !verbose {
        if let Some(object) = value.as_object_mut() {
            object.remove("tags");
        }
    }

    serde_json::to_writer_pretty(&mut *out, &value)?;
    writeln!(out)?;
    Ok(())
}

pub fn text(out: &mut impl io::Write, path: &str, size: u64, report: &FlvReport, verbose: bool) -> io::Result<()> {
    writeln!(out, "File: {path}")?;
    writeln!(out, "Size: {size} bytes")?;
    writeln!(out, "Format: FLV/E-FLV")?;

    let header = &report.header;
    writeln!(out)?;
    writeln!(out, "Header")?;
    writeln!(out, "  Version:     {}", header.version)?;
    writeln!(out, "  Has Audio:   {}", header.has_audio)?;
    writeln!(out, "  Has Video:   {}", header.has_video)?;
    writeln!(out, "  Data Offset: {}", header.data_offset)?;

    let counts = &report.tag_counts;
    writeln!(out)?;
    writeln!(out, "Tags")?;
    writeln!(out, "  Total:  {}", counts.total)?;
    writeln!(out, "  Audio:  {}", counts.audio)?;
    writeln!(out, "  Video:  {}", counts.video)?;
    writeln!(out, "  Script: {}", counts.script)?;
    writeln!(out, "  Other:  {}", counts.other)?;

    for metadata in &report.metadata {
        writeln!(out)?;
        writeln!(out, "Metadata (onMetaData)")?;
        for (name, value) in metadata.iter() {
            writeln!(out, "  {name}: {}", amf0(value))?;
        }
    }

    for config in &report.codec_configs {
        writeln!(out)?;
        writeln!(out, "CodecConfigurationRecord ({}: {})", config.track, config.codec)?;
        for field in &config.fields {
            writeln!(out, "  {}: {}", field.name, field.value)?;
        }
    }

    if verbose {
        writeln!(out)?;
        writeln!(out, "Tag Index")?;
        for (i, tag) in report.tags.iter().enumerate() {
            writeln!(
                out,
                "  #{i:<5} offset={:<10} type={:<3} size={:<8} timestamp={:<10} stream={}",
                tag.offset, tag.tag_type.0, tag.data_size, tag.timestamp_ms, tag.stream_id
            )?;
        }
    }

    Ok(())
}

fn amf0(value: &Amf0Value) -> String {
    match value {
        Amf0Value::Number(v) | Amf0Value::Date(v) => v.to_string(),
        Amf0Value::Boolean(v) => v.to_string(),
        Amf0Value::String(v) | Amf0Value::LongString(v) => v.clone(),
        Amf0Value::Null => "null".to_owned(),
        Amf0Value::Object(o) | Amf0Value::EcmaArray(o) => {
            let props: Vec<_> = o.iter().map(|(k, v)| format!("{k}: {}", amf0(v))).collect();
            format!("{{{}}}", props.join(", "))
        }
        Amf0Value::StrictArray(values) => {
            let values: Vec<_> = values.iter().map(amf0).collect();
            format!("[{}]", values.join(", "))
        }
    }
}
