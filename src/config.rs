use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "term-2048")]
#[command(author, version, about = "Just another 2048 game for the terminal")]
pub struct Args {
    /// Seed for tile placement, for reproducible games
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Write log records to this file instead of stderr
    #[arg(short, long)]
    pub log_file: Option<PathBuf>,
}
