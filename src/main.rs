mod block;
mod chapter;
mod cli;
mod epub_reader;
mod error;
mod html_reader;
mod merge;
mod nav;
mod segment;
mod walk;
mod writer;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(&cli);
    match &cli.command {
        cli::Command::Html { inpaths, outdir } => html_reader::extract(inpaths, outdir),
        cli::Command::Epub { inpaths, outdir } => epub_reader::extract(inpaths, outdir),
    }
}

fn init_tracing(cli: &cli::Cli) {
    let default = if cli.debug {
        "debug"
    } else if cli.info {
        "info"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
