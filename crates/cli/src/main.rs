#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use cmd::Commands;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod cmd;
mod render;

#[derive(Debug, clap::Parser)]
#[command(name = "eflv", bin_name = "eflv", about = "Inspect FLV and Enhanced RTMP (E-FLV) files", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = Cli::parse().command.run() {
        Cli::command().error(ErrorKind::InvalidValue, format!("{err:#}")).exit()
    }
}
