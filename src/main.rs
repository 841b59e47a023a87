//! CLI entry point for the yeast cell fluorescence measurement tool

use budquant::io::cli::{Cli, FileProcessor};
use clap::Parser;

fn main() -> budquant::Result<()> {
    let cli = Cli::parse();
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
