use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Extract chapter-structured book text into normalized plain-text files
#[derive(Parser, Debug)]
#[command(name = "book2txt", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity to INFO
    #[arg(short, long, global = true, conflicts_with = "debug")]
    pub info: bool,

    /// Increase log verbosity to DEBUG
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read literature chapters stored as HTML files and write one text
    /// file for each book found
    Html {
        /// The paths to search for files to read
        #[arg(value_name = "PATH", required = true)]
        inpaths: Vec<PathBuf>,

        /// The directory to write the extracted book data to
        #[arg(short, long, value_name = "PATH")]
        outdir: PathBuf,
    },
    /// Read literature chapters stored in EPUB format and write one text
    /// file for each book found
    Epub {
        /// The paths to search for files to read
        #[arg(value_name = "PATH", required = true)]
        inpaths: Vec<PathBuf>,

        /// The directory to write the extracted book data to
        #[arg(short, long, value_name = "PATH")]
        outdir: PathBuf,
    },
}
