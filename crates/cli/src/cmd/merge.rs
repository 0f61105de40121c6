use std::path::PathBuf;

#[derive(Debug, Clone, clap::Parser)]
pub struct Merge {
    /// The first input file
    a: PathBuf,
    /// The second input file
    b: PathBuf,
    #[clap(long, short)]
    /// Where to write the merged file
    output: PathBuf,
    #[clap(long)]
    /// Keep each input as its own track group instead of interleaving into one
    multitrack: bool,
}

impl Merge {
    pub fn run(self) -> anyhow::Result<()> {
        for input in [&self.a, &self.b] {
            let (report, _) = super::inspect(input, false)?;
            tracing::info!(
                input = %input.display(),
                tags = report.tag_counts.total,
                "validated merge input"
            );
        }

        anyhow::bail!(
            "merge is not implemented (output {}, multitrack {})",
            self.output.display(),
            self.multitrack
        )
    }
}
