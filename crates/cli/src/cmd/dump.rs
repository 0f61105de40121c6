use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;

use crate::render;

#[derive(Debug, Clone, clap::Parser)]
pub struct Dump {
    /// The FLV / E-FLV file to inspect
    input: PathBuf,
    #[clap(long)]
    /// Output machine-readable JSON instead of text
    json: bool,
    #[clap(long)]
    /// Include lower-level details (offsets, timestamps, per-tag index)
    verbose: bool,
}

impl Dump {
    pub fn run(self) -> anyhow::Result<()> {
        let (report, size) = super::inspect(&self.input, self.verbose)?;
        let path = self.input.display().to_string();

        let mut stdout = io::stdout().lock();
        if self.json {
            render::json(&mut stdout, &path, size, &report, self.verbose)?;
        } else {
            render::text(&mut stdout, &path, size, &report, self.verbose)?;
        }

        stdout.flush().context("failed to write output")
    }
}
