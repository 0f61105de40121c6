use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use erlab_flv::FlvReport;

mod dump;
mod merge;

#[derive(Debug, Clone, clap::Subcommand)]
pub enum Commands {
    /// Dump structural information about an FLV / E-FLV file
    Dump(dump::Dump),
    /// Merge two FLV / E-FLV files into one
    Merge(merge::Merge),
}

impl Commands {
    pub fn run(self) -> anyhow::Result<()> {
        match self {
            Commands::Dump(cmd) => cmd.run().context("dump"),
            Commands::Merge(cmd) => cmd.run().context("merge"),
        }
    }
}

/// Opens `path` and walks it, returning the report and the file size.
/// The per-tag index is only collected when `index` is set.
fn inspect(path: &Path, index: bool) -> anyhow::Result<(FlvReport, u64)> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let size = file
        .metadata()
        .with_context(|| format!("failed to stat {}", path.display()))?
        .len();

    let reader = BufReader::with_capacity(1 << 20, file);
    let report = if index {
        FlvReport::inspect_with_index(reader)
    } else {
        FlvReport::inspect(reader)
    }
    .with_context(|| format!("failed to read {}", path.display()))?;

    Ok((report, size))
}
